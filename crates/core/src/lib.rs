mod binding;
mod error;
mod event;
mod mirror;
mod reminder;
mod shared;

pub use binding::{ActivityBindings, DeleteBindingUseCase, FetchBindingUseCase, UpdateBindingUseCase};
pub use error::EngineError;
pub use event::{DeleteInternalEventUseCase, MonthShards};
pub use mirror::{CalendarMirror, DeleteMirrorEventUseCase, SaveMirrorEventUseCase};
pub use reminder::{
    DeleteReminderUseCase, ReminderProjector, SaveReminderUseCase, ToggleReminderUseCase,
};
pub use shared::usecase::{execute, UseCase};
