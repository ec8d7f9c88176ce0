pub mod moments;
pub mod reducer;
