pub mod log;
pub mod room;

pub use log::{DailyLogSnapshot, History, LegacySets, MealEntry, WorkoutEntry, WorkoutSet};
pub use room::{GLOBAL_ROOM, RoomMessage};
