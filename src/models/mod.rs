mod analysis;
mod round;
mod session;
mod tap;

pub use analysis::AnalysisGameSession;
pub use round::{Round, RoundStamp};
pub use session::{EventEntry, RawEvent, Session, SessionOutcome};
pub use tap::Tap;
