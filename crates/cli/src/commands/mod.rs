//! CLI Commands

pub mod check;
pub mod init;
pub mod insights;
pub mod simulate;

pub use check::CheckCommand;
pub use init::InitCommand;
pub use insights::InsightsCommand;
pub use simulate::SimulateCommand;
