pub mod calendar;
pub mod emails;
pub mod handlers;
pub mod mailer;

pub use handlers::{notification_hooks, NOTIFICATION_BUFFER_SIZE};
pub use mailer::{AnyMailer, EmailAttachment, LogMailer, Mailer, OutgoingEmail, RelayMailer};
