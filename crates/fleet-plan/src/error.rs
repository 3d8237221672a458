use fleet_alloc::AllocError;
use fleet_core::{TemplateId, VehicleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("template {0} supplied more than once")]
    DuplicateTemplate(TemplateId),

    #[error("vehicle {0} supplied more than once")]
    DuplicateVehicle(VehicleId),

    #[error("vehicle {0} is not in the planner's fleet")]
    UnknownVehicle(VehicleId),

    #[error("plan range spans {days} days, limit is {max}")]
    HorizonTooLong { days: i64, max: u32 },

    #[error(transparent)]
    Alloc(#[from] AllocError),
}

pub type PlanResult<T> = Result<T, PlanError>;
