use ndarray::Array2;

/// Offline change-point detection over a row-per-observation series.
pub trait ChangePointDetector: Send {
    /// Returns segment end indices in ascending order. The final element is
    /// always the series length, so a series with no interior change points
    /// yields `[n]`.
    fn detect(
        &self,
        series: &Array2<f64>,
        penalty: f64,
    ) -> Result<Vec<usize>, Box<dyn std::error::Error>>;
}
