pub mod coach;
pub mod intake;
pub mod quoting;
