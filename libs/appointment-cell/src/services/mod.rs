pub mod booking;
pub mod dashboard;
pub mod lifecycle;
pub mod slots;

pub use booking::AppointmentBookingService;
pub use dashboard::DashboardService;
pub use lifecycle::AppointmentLifecycleService;
pub use slots::SlotService;
