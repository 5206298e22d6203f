// Packing model: translates a PackingSpec into an integer program
//
// Column layout: one binary placement variable per entry of the PlacementIndex,
// followed by one binary coverage variable per cell in row-major order.

use crate::domain::{
    models::{Constraint, ObjectiveFunction, OptimizationProblem, SolverConfig, Variable},
    packing::{BinSpec, PackingSpec},
    placement::PlacementIndex,
    value_objects::ConstraintType,
};
use tracing::debug;

/// Switches that change the constraint set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelOptions {
    /// Also emit `Σ covering ≤ 1` per cell instead of relying only on the
    /// binary domain of the coverage variable.
    pub explicit_cell_capacity: bool,
}

/// Integer program for one packing run together with its variable index
#[derive(Debug, Clone)]
pub struct PackingModel {
    pub problem: OptimizationProblem,
    pub index: PlacementIndex,
    bin: BinSpec,
}

impl PackingModel {
    pub fn num_placements(&self) -> usize {
        self.index.len()
    }

    /// Column of the coverage variable of `(row, col)`.
    pub fn coverage_column(&self, row: usize, col: usize) -> usize {
        self.index.len() + row * self.bin.width + col
    }

    pub fn bin(&self) -> &BinSpec {
        &self.bin
    }
}

/// Build variables, constraints and objective for `spec`.
pub fn build_model(spec: &PackingSpec, options: ModelOptions) -> PackingModel {
    let index = PlacementIndex::build(spec);
    let bin = *spec.bin();
    let num_placements = index.len();

    let mut variables: Vec<Variable> = index
        .placements()
        .iter()
        .map(|p| Variable::binary(p.variable_name()))
        .collect();
    for row in 0..bin.height {
        for col in 0..bin.width {
            variables.push(Variable::binary(format!("used_{}_{}", row, col)));
        }
    }

    let mut constraints = coverage_constraints(spec, &index);
    constraints.extend(inventory_constraints(spec, &index));
    if options.explicit_cell_capacity {
        constraints.extend(capacity_constraints(spec, &index));
    }

    let objective = assemble_objective(spec, &index);

    debug!(
        placements = num_placements,
        cells = bin.cells(),
        constraints = constraints.len(),
        explicit_cell_capacity = options.explicit_cell_capacity,
        "built packing model"
    );

    let problem = OptimizationProblem::new(objective)
        .with_name(format!("2D_Rectangular_Bin_Packing_{}x{}", bin.width, bin.height))
        .with_variables(variables)
        .with_constraints(constraints)
        .with_config(SolverConfig {
            // backend chatter only at trace level
            verbose: tracing::enabled!(tracing::Level::TRACE),
            ..SolverConfig::default()
        });

    PackingModel {
        problem,
        index,
        bin,
    }
}

/// `used(i,j) − Σ covering placements = 0` for every cell, covered or not.
pub fn coverage_constraints(spec: &PackingSpec, index: &PlacementIndex) -> Vec<Constraint> {
    let bin = spec.bin();
    let mut constraints = Vec::with_capacity(bin.cells());
    for row in 0..bin.height {
        for col in 0..bin.width {
            let used = index.len() + row * bin.width + col;
            let mut terms = vec![(used, 1.0)];
            terms.extend(index.covering(row, col).into_iter().map(|k| (k, -1.0)));
            constraints.push(
                Constraint::new(ConstraintType::Equal, terms, 0.0)
                    .with_name(format!("cover_{}_{}", row, col)),
            );
        }
    }
    constraints
}

/// `Σ placements of type k ≤ count(k)` for every item type.
pub fn inventory_constraints(spec: &PackingSpec, index: &PlacementIndex) -> Vec<Constraint> {
    spec.items()
        .iter()
        .map(|item| {
            let terms = index.of_item(item.id).map(|k| (k, 1.0)).collect();
            Constraint::new(ConstraintType::LessThanOrEqual, terms, item.count as f64)
                .with_name(format!("inventory_{}", item.id.index()))
        })
        .collect()
}

/// `Σ covering placements ≤ 1` for every cell.
pub fn capacity_constraints(spec: &PackingSpec, index: &PlacementIndex) -> Vec<Constraint> {
    let bin = spec.bin();
    let mut constraints = Vec::with_capacity(bin.cells());
    for row in 0..bin.height {
        for col in 0..bin.width {
            let terms = index.covering(row, col).into_iter().map(|k| (k, 1.0)).collect();
            constraints.push(
                Constraint::new(ConstraintType::LessThanOrEqual, terms, 1.0)
                    .with_name(format!("capacity_{}_{}", row, col)),
            );
        }
    }
    constraints
}

/// Maximize `Σ [used·reward + (1−used)·penalty] − Σ x·unit_cost`.
///
/// Assembled as `(reward − penalty)` on each coverage column, `−unit_cost` on
/// each placement column and `penalty · cells` as the constant.
pub fn assemble_objective(spec: &PackingSpec, index: &PlacementIndex) -> ObjectiveFunction {
    let rewards = spec.rewards();
    let cells = spec.bin().cells();

    let mut coefficients: Vec<f64> = index
        .placements()
        .iter()
        .map(|p| spec.item(p.item).map_or(0.0, |item| -item.unit_cost))
        .collect();
    coefficients.extend(std::iter::repeat(rewards.reward - rewards.penalty).take(cells));

    ObjectiveFunction::new(coefficients)
        .with_constant(rewards.penalty * cells as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::packing::{ItemConfig, ItemTypeId, PackingConfig};
    use approx::assert_relative_eq;

    fn reference() -> PackingSpec {
        PackingConfig::default().validate().unwrap()
    }

    #[test]
    fn declares_placement_then_coverage_columns() {
        let model = build_model(&reference(), ModelOptions::default());
        assert_eq!(model.num_placements(), 21);
        assert_eq!(model.problem.num_variables(), 21 + 12);
        assert_eq!(model.problem.variables[0].name, "x_0_0_0");
        assert_eq!(model.problem.variables[20].name, "x_1_2_2");
        assert_eq!(model.problem.variables[model.coverage_column(1, 2)].name, "used_1_2");
    }

    #[test]
    fn one_coverage_equality_per_cell_and_one_bound_per_type() {
        let model = build_model(&reference(), ModelOptions::default());
        let constraints = &model.problem.constraints;
        assert_eq!(constraints.len(), 12 + 2);

        let equalities: Vec<_> = constraints
            .iter()
            .filter(|c| c.constraint_type == ConstraintType::Equal)
            .collect();
        assert_eq!(equalities.len(), 12);

        // corner cell: one 1x1 anchor, one 2x1 anchor
        let corner = &equalities[0];
        assert_eq!(corner.name, "cover_0_0");
        assert_eq!(corner.terms.len(), 3);
        assert_eq!(corner.terms[0], (model.coverage_column(0, 0), 1.0));
        assert_relative_eq!(corner.bound, 0.0);

        // interior column: one 1x1 anchor, two 2x1 anchors
        let inner = constraints.iter().find(|c| c.name == "cover_1_1").unwrap();
        assert_eq!(inner.terms.len(), 4);

        let inventory: Vec<_> = constraints
            .iter()
            .filter(|c| c.constraint_type == ConstraintType::LessThanOrEqual)
            .collect();
        assert_eq!(inventory[0].name, "inventory_0");
        assert_eq!(inventory[0].terms.len(), 12);
        assert_relative_eq!(inventory[0].bound, 3.0);
        assert_eq!(inventory[1].terms.len(), 9);
        assert_relative_eq!(inventory[1].bound, 4.0);
    }

    #[test]
    fn uncoverable_cell_still_gets_constraint() {
        let spec = PackingConfig {
            bin_width: 1,
            bin_height: 1,
            items: vec![ItemConfig::new(2, 2, 1, 1.0)],
            ..PackingConfig::default()
        }
        .validate()
        .unwrap();
        let model = build_model(&spec, ModelOptions::default());

        assert_eq!(model.num_placements(), 0);
        assert_eq!(model.problem.num_variables(), 1);
        let cover = &model.problem.constraints[0];
        assert_eq!(cover.terms, vec![(0, 1.0)]);
        let inventory = &model.problem.constraints[1];
        assert!(inventory.terms.is_empty());
    }

    #[test]
    fn objective_reduced_form() {
        let spec = reference();
        let model = build_model(&spec, ModelOptions::default());
        let objective = &model.problem.objective;

        assert_relative_eq!(objective.coefficients[0], -5.0);
        assert_relative_eq!(objective.coefficients[12], -3.0);
        assert_relative_eq!(objective.coefficients[model.coverage_column(0, 0)], 20.0);
        assert_relative_eq!(objective.constant, -120.0);
    }

    #[test]
    fn objective_matches_expanded_form() {
        let spec = reference();
        let model = build_model(&spec, ModelOptions::default());

        // x_1_0_0 and x_0_2_3 selected
        let mut values = vec![0.0; model.problem.num_variables()];
        let wide = model.index.position(ItemTypeId(1), 0, 0).unwrap();
        let small = model.index.position(ItemTypeId(0), 2, 3).unwrap();
        values[wide] = 1.0;
        values[small] = 1.0;
        for (r, c) in [(0, 0), (0, 1), (2, 3)] {
            values[model.coverage_column(r, c)] = 1.0;
        }

        let expanded: f64 = (0..3)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .map(|(r, c)| {
                let used = values[model.coverage_column(r, c)];
                used * 10.0 + (1.0 - used) * -10.0
            })
            .sum::<f64>()
            - 3.0
            - 5.0;
        assert_relative_eq!(model.problem.objective.evaluate(&values), expanded);

        for constraint in &model.problem.constraints {
            let activity = constraint.activity(&values);
            match constraint.constraint_type {
                ConstraintType::Equal => assert_relative_eq!(activity, constraint.bound),
                ConstraintType::LessThanOrEqual => assert!(activity <= constraint.bound),
            }
        }
    }

    #[test]
    fn explicit_capacity_adds_cell_inequalities() {
        let spec = reference();
        let plain = build_model(&spec, ModelOptions::default());
        let strict = build_model(
            &spec,
            ModelOptions {
                explicit_cell_capacity: true,
            },
        );
        assert_eq!(strict.problem.constraints.len(), plain.problem.constraints.len() + 12);
        let capacity = strict
            .problem
            .constraints
            .iter()
            .find(|c| c.name == "capacity_0_0")
            .unwrap();
        assert_eq!(capacity.constraint_type, ConstraintType::LessThanOrEqual);
        assert_eq!(capacity.terms.len(), 2);
        assert_relative_eq!(capacity.bound, 1.0);
    }

    #[test]
    fn zero_count_type_is_bounded_to_nothing() {
        let spec = PackingConfig {
            items: vec![ItemConfig::new(1, 1, 0, 1.0)],
            ..PackingConfig::default()
        }
        .validate()
        .unwrap();
        let model = build_model(&spec, ModelOptions::default());
        let inventory = model
            .problem
            .constraints
            .iter()
            .find(|c| c.name == "inventory_0")
            .unwrap();
        assert_eq!(inventory.terms.len(), 12);
        assert_relative_eq!(inventory.bound, 0.0);
    }
}
