#![allow(dead_code)]
use hebdoplan::{MipSolver, SolverError, SolverFactory, SolverOutcome, SolverStatus, WeekMatrix};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Fabrique scriptée : rejoue des issues préparées (une par phase) et
/// capture chaque modèle LP reçu.
pub struct ScriptedFactory {
    outcomes: Rc<RefCell<VecDeque<SolverOutcome>>>,
    pub models: Rc<RefCell<Vec<String>>>,
}

impl ScriptedFactory {
    pub fn new(outcomes: Vec<SolverOutcome>) -> Self {
        Self {
            outcomes: Rc::new(RefCell::new(outcomes.into())),
            models: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn model(&self, index: usize) -> String {
        self.models.borrow()[index].clone()
    }

    pub fn solve_count(&self) -> usize {
        self.models.borrow().len()
    }
}

impl SolverFactory for ScriptedFactory {
    fn spawn(&self) -> Result<Box<dyn MipSolver>, SolverError> {
        Ok(Box::new(ScriptedSolver {
            outcomes: Rc::clone(&self.outcomes),
            models: Rc::clone(&self.models),
        }))
    }
}

struct ScriptedSolver {
    outcomes: Rc<RefCell<VecDeque<SolverOutcome>>>,
    models: Rc<RefCell<Vec<String>>>,
}

impl MipSolver for ScriptedSolver {
    fn solve(&mut self, model: &str) -> Result<SolverOutcome, SolverError> {
        self.models.borrow_mut().push(model.to_string());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| SolverError::Exit("no scripted outcome left".to_string()))
    }
}

pub fn outcome(status: SolverStatus, vars: &[(&str, f64)]) -> SolverOutcome {
    SolverOutcome {
        status,
        primal: vars.iter().map(|(name, value)| (name.to_string(), *value)).collect(),
    }
}

pub fn optimal(vars: &[(&str, f64)]) -> SolverOutcome {
    outcome(SolverStatus::Optimal, vars)
}

pub fn demand_cells(cells: &[(u8, u8, u32)]) -> WeekMatrix {
    let mut matrix = WeekMatrix::zeroed();
    for (day, hour, orders) in cells {
        matrix.set(*day, *hour, *orders);
    }
    matrix
}
