//! Confusion matrix for multi-class classification

use serde::Serialize;

/// Confusion matrix for multi-class classification
///
/// Element [i][j] counts instances of actual class i predicted as class j,
/// both in the dataset's class order. Raw counts only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfusionMatrix {
    /// `matrix[actual][predicted]`
    matrix: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Create an empty matrix for `n_classes` classes; 0 disables it
    pub fn new(n_classes: usize) -> Self {
        Self {
            matrix: vec![vec![0; n_classes]; n_classes],
        }
    }

    /// Count one instance; returns false (and counts nothing) if either index
    /// is outside [0, n_classes)
    pub fn add(&mut self, actual: usize, predicted: usize) -> bool {
        let n = self.n_classes();
        if actual >= n || predicted >= n {
            return false;
        }
        self.matrix[actual][predicted] += 1;
        true
    }

    /// Owned copy of the grid, rows = actual class
    pub fn to_rows(&self) -> Vec<Vec<usize>> {
        self.matrix.clone()
    }

    /// Number of classes, 0 when disabled
    pub fn n_classes(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Instances of `class` predicted as `class`
    pub fn true_positives(&self, class: usize) -> usize {
        self.matrix[class][class]
    }

    /// Instances of other classes predicted as `class`
    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.n_classes())
            .filter(|&i| i != class)
            .map(|i| self.matrix[i][class])
            .sum()
    }

    /// Instances of `class` predicted as another class
    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.n_classes())
            .filter(|&j| j != class)
            .map(|j| self.matrix[class][j])
            .sum()
    }

    /// Row sum: instances whose actual class is `class`
    pub fn support(&self, class: usize) -> usize {
        self.matrix[class].iter().sum()
    }

    /// Counted instances
    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    /// Cohen's kappa: agreement corrected for chance
    ///
    /// NaN for an empty matrix; 1.0 when chance agreement is already perfect.
    pub fn kappa(&self) -> f64 {
        let n = self.n_classes();
        let total = self.total() as f64;
        if total == 0.0 {
            return f64::NAN;
        }

        let mut chance = 0.0;
        let mut correct = 0.0;
        for i in 0..n {
            let row: usize = self.matrix[i].iter().sum();
            let column: usize = (0..n).map(|r| self.matrix[r][i]).sum();
            chance += row as f64 * column as f64;
            correct += self.matrix[i][i] as f64;
        }
        chance /= total * total;
        correct /= total;

        if chance < 1.0 {
            (correct - chance) / (1.0 - chance)
        } else {
            1.0
        }
    }
}
