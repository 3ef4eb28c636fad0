pub mod profile;

pub use profile::PatientService;
