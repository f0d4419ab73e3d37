pub mod change_point_analyzer;
pub mod change_point_detector;
pub mod novelty;
