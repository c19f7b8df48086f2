//! ResourceService: generic CRUD with merge-patch updates over an injected repository.

mod crud;
pub use crud::ResourceService;
