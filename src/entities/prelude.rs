pub use super::daily_logs::Entity as DailyLogs;
pub use super::feedback::Entity as Feedback;
pub use super::manual_prs::Entity as ManualPrs;
pub use super::meal_entries::Entity as MealEntries;
pub use super::one_time_codes::Entity as OneTimeCodes;
pub use super::room_messages::Entity as RoomMessages;
pub use super::users::Entity as Users;
pub use super::weight_entries::Entity as WeightEntries;
pub use super::workout_entries::Entity as WorkoutEntries;
