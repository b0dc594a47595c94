pub mod mileage_controller;
pub mod report_controller;
pub mod vehicle_controller;
