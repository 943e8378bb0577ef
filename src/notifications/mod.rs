mod handler;
mod notification;
mod notification_content;

pub(crate) use self::handler::deliver;
pub use self::{
    handler::NotificationHandler, notification::Notification,
    notification_content::NotificationContent,
};
