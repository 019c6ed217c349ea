pub mod run;
pub mod training;
