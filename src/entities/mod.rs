pub mod prelude;

pub mod daily_logs;
pub mod feedback;
pub mod manual_prs;
pub mod meal_entries;
pub mod one_time_codes;
pub mod room_messages;
pub mod users;
pub mod weight_entries;
pub mod workout_entries;
