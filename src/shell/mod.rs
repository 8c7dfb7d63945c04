// Composition root for the employee portal.
//
// Responsibilities
// - Read config from environment.
// - Instantiate the concrete backend adapters.
// - Wire them into the profile and document accessors and the check-ins and dashboard stores.

pub mod state;
