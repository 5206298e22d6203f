// Solution decoder: maps a solver assignment back onto the bin

use super::model_builder::PackingModel;
use crate::domain::{
    grid::Grid,
    models::Solution,
    value_objects::SolutionStatus,
};
use tracing::error;

/// Default distance from 0 or 1 tolerated for a binary variable
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Cannot decode a solution with status {0}")]
    NotOptimal(SolutionStatus),

    #[error("Solution has {actual} values but the model declares {expected} variables")]
    Shape { expected: usize, actual: usize },

    #[error("Binary variable {index} '{name}' has non-binary value {value}")]
    NumericTolerance {
        index: usize,
        name: String,
        value: f64,
    },
}

/// Turns an optimal [`Solution`] into a [`Grid`].
///
/// Placements with value above 0.5 are stamped in column order. When two
/// selected placements overlap, the one with the higher column wins the
/// shared cells.
#[derive(Debug, Clone, Copy)]
pub struct SolutionDecoder {
    tolerance: f64,
}

impl Default for SolutionDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolutionDecoder {
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn decode(&self, model: &PackingModel, solution: &Solution) -> Result<Grid, DecodeError> {
        if !solution.status.has_values() {
            return Err(DecodeError::NotOptimal(solution.status));
        }

        let values = &solution.variable_values;
        let expected = model.problem.num_variables();
        if values.len() != expected {
            return Err(DecodeError::Shape {
                expected,
                actual: values.len(),
            });
        }

        for (index, (var, &value)) in model.problem.variables.iter().zip(values).enumerate() {
            if !self.is_binary(value) {
                error!(
                    variable = %var.name,
                    value,
                    tolerance = self.tolerance,
                    "solver returned a non-binary value for a binary variable"
                );
                return Err(DecodeError::NumericTolerance {
                    index,
                    name: var.name.clone(),
                    value,
                });
            }
        }

        let mut grid = Grid::empty(model.bin());
        for (placement, &value) in model.index.placements().iter().zip(values) {
            if value > 0.5 {
                grid.stamp(*placement);
            }
        }
        Ok(grid)
    }

    fn is_binary(&self, value: f64) -> bool {
        value.abs() <= self.tolerance || (value - 1.0).abs() <= self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::model_builder::{build_model, ModelOptions};
    use crate::domain::packing::{ItemTypeId, PackingConfig};

    fn model() -> PackingModel {
        build_model(&PackingConfig::default().validate().unwrap(), ModelOptions::default())
    }

    fn select(model: &PackingModel, picks: &[(usize, usize, usize)]) -> Vec<f64> {
        let mut values = vec![0.0; model.problem.num_variables()];
        for &(item, row, col) in picks {
            let k = model.index.position(ItemTypeId(item), row, col).unwrap();
            values[k] = 1.0;
            for (r, c) in model.index.placements()[k].cells() {
                values[model.coverage_column(r, c)] = 1.0;
            }
        }
        values
    }

    #[test]
    fn stamps_selected_placements() {
        let model = model();
        let values = select(&model, &[(1, 0, 0), (1, 0, 2), (0, 2, 1)]);
        let grid = SolutionDecoder::new()
            .decode(&model, &Solution::optimal(0.0, values))
            .unwrap();

        assert_eq!(grid.label_rows(), vec!["BBBB", "....", ".A.."]);
        assert_eq!(grid.placed().len(), 3);
    }

    #[test]
    fn decoding_is_idempotent() {
        let model = model();
        let solution = Solution::optimal(0.0, select(&model, &[(1, 1, 1), (0, 0, 0)]));
        let decoder = SolutionDecoder::new();
        assert_eq!(
            decoder.decode(&model, &solution).unwrap(),
            decoder.decode(&model, &solution).unwrap()
        );
    }

    #[test]
    fn tolerates_float_noise() {
        let model = model();
        let mut values = select(&model, &[(0, 1, 1)]);
        for v in values.iter_mut() {
            *v = if *v > 0.5 { 1.0 - 1e-9 } else { 1e-9 };
        }
        let grid = SolutionDecoder::new()
            .decode(&model, &Solution::optimal(0.0, values))
            .unwrap();
        assert_eq!(grid.get(1, 1), Some(ItemTypeId(0)));
        assert_eq!(grid.covered_cells(), 1);
    }

    #[test]
    fn rejects_fractional_values() {
        let model = model();
        let mut values = select(&model, &[]);
        values[4] = 0.4;
        let err = SolutionDecoder::new()
            .decode(&model, &Solution::optimal(0.0, values))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::NumericTolerance {
                index: 4,
                name: "x_0_1_0".to_string(),
                value: 0.4
            }
        );
    }

    #[test]
    fn rejects_fractional_coverage_values() {
        let model = model();
        let mut values = select(&model, &[(0, 0, 0)]);
        let column = model.coverage_column(2, 3);
        values[column] = 0.5;
        let err = SolutionDecoder::new()
            .decode(&model, &Solution::optimal(0.0, values))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::NumericTolerance {
                index: column,
                name: "used_2_3".to_string(),
                value: 0.5
            }
        );
    }

    #[test]
    fn rejects_non_optimal_and_misshapen_solutions() {
        let model = model();
        let decoder = SolutionDecoder::new();
        assert_eq!(
            decoder.decode(&model, &Solution::not_solved("deadline")),
            Err(DecodeError::NotOptimal(SolutionStatus::NotSolved))
        );
        assert_eq!(
            decoder.decode(&model, &Solution::optimal(0.0, vec![0.0; 3])),
            Err(DecodeError::Shape {
                expected: 33,
                actual: 3
            })
        );
    }

    #[test]
    fn overlapping_selection_later_column_wins() {
        let model = model();
        // 2x1 at (0,0) has a higher column than the 1x1 at (0,1)
        let values = select(&model, &[(0, 0, 1), (1, 0, 0)]);
        let grid = SolutionDecoder::new()
            .decode(&model, &Solution::optimal(0.0, values))
            .unwrap();
        assert_eq!(grid.get(0, 1), Some(ItemTypeId(1)));
        assert_eq!(grid.coverage_count(0, 1), 2);
    }
}
