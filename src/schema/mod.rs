pub mod descriptor;
pub mod record;
