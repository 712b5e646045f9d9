pub mod matrix_profile;
pub mod window_stats;
