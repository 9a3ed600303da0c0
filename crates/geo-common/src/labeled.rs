//! Operations shared by [`DataArray`] and [`Dataset`].

use crate::array::{Coords, DataArray, Variable};
use crate::dataset::Dataset;

/// A container whose dimensions are labeled by coordinate variables.
pub trait Labeled {
    fn coords(&self) -> &Coords;

    fn coords_mut(&mut self) -> &mut Coords;

    /// Variable by name, coordinates first.
    fn variable(&self, name: &str) -> Option<&Variable> {
        self.coords().get(name)
    }

    fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.coords_mut().get_mut(name)
    }

    /// Rename a variable and the dimension of the same name.
    fn rename(&mut self, old: &str, new: &str);

    fn has_variable(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }
}

fn rename_in(vars: &mut std::collections::BTreeMap<String, Variable>, old: &str, new: &str) {
    for var in vars.values_mut() {
        var.rename_dim(old, new);
    }
    if let Some(var) = vars.remove(old) {
        vars.insert(new.to_string(), var);
    }
}

impl Labeled for DataArray {
    fn coords(&self) -> &Coords {
        &self.coords
    }

    fn coords_mut(&mut self) -> &mut Coords {
        &mut self.coords
    }

    fn rename(&mut self, old: &str, new: &str) {
        for d in self.dims.iter_mut().filter(|d| d.as_str() == old) {
            *d = new.to_string();
        }
        rename_in(&mut self.coords, old, new);
    }
}

impl Labeled for Dataset {
    fn coords(&self) -> &Coords {
        &self.coords
    }

    fn coords_mut(&mut self) -> &mut Coords {
        &mut self.coords
    }

    fn variable(&self, name: &str) -> Option<&Variable> {
        self.coords.get(name).or_else(|| self.data_vars.get(name))
    }

    fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        match self.coords.get_mut(name) {
            Some(var) => Some(var),
            None => self.data_vars.get_mut(name),
        }
    }

    fn rename(&mut self, old: &str, new: &str) {
        rename_in(&mut self.coords, old, new);
        rename_in(&mut self.data_vars, old, new);
    }
}
