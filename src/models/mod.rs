pub mod record;
pub mod work_mode;
