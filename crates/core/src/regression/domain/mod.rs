pub mod progress_regressor;
