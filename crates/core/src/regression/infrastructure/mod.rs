pub mod forest_regressor;
