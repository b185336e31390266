//! Core records shared by every stage of the engine

mod degradation;
mod load;
mod member;
mod signal;

pub use degradation::{Degradation, SignalSource};
pub use load::{
    BurnoutRisk, Capacity, CapacityStatus, Dimension, DimensionValues, LoadDetail, LoadMap,
    LoadVector, SourceType, BASELINE_CAPACITY,
};
pub use member::{validate_roster, Member, Role};
pub use signal::{Complexity, Event, Habit, Task, TimeWindow, MAX_TASK_EFFORT};
