pub mod predict_use_case;
