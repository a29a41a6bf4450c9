//! Shared contracts between the backend service and API consumers:
//! domain aggregates, enums, use-case requests/responses and progress DTOs.

pub mod dashboards;
pub mod domain;
pub mod enums;
pub mod projections;
pub mod shared;
pub mod system;
pub mod usecases;
