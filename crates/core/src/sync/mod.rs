//! Remote-primary persistence with a local mirror

mod autosave;
mod coordinator;
mod notify;

pub use autosave::Autosaver;
pub use coordinator::DualWriteCoordinator;
pub use notify::NotificationChannel;
