pub mod daily_log;
pub mod feedback;
pub mod otp;
pub mod record;
pub mod room;
pub mod user;
pub mod weight;
