pub mod change_operation;
pub mod run_application;

pub use change_operation::ChangeOperationUseCase;
pub use run_application::RunApplicationUseCase;
