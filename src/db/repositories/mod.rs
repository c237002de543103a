mod analyses;
mod sessions;
