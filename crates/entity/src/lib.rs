//! Entity definitions for Conducta
//!
//! Sea-ORM models for the six tables of the incident tracker: roles, users,
//! groups, students, categories and incidents.

pub mod categories;
pub mod groups;
pub mod incidents;
pub mod roles;
pub mod sea_orm_active_enums;
pub mod students;
pub mod users;

pub use categories::Entity as Categories;
pub use groups::Entity as Groups;
pub use incidents::Entity as Incidents;
pub use roles::Entity as Roles;
pub use students::Entity as Students;
pub use users::Entity as Users;
