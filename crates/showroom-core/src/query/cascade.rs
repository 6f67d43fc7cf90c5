// Make → model dependent sets.
//
// Every change to the selected makes goes through these helpers so the
// selected models never outlive the makes that contribute them.

use std::collections::{BTreeMap, BTreeSet};

pub(super) type MakesModels = BTreeMap<String, Vec<String>>;

/// Union of the model lists of `makes`.
pub(super) fn models_of<'a, I>(makes_models: &MakesModels, makes: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    makes
        .into_iter()
        .filter_map(|make| makes_models.get(make))
        .flatten()
        .cloned()
        .collect()
}

/// Drop every selected model not contributed by a selected make.
pub(super) fn prune_models(
    makes_models: &MakesModels,
    selected_makes: &BTreeSet<String>,
    selected_models: &mut BTreeSet<String>,
) {
    let reachable = models_of(makes_models, selected_makes);
    selected_models.retain(|model| reachable.contains(model));
}

/// Add every model of `makes` to the selection.
pub(super) fn add_models_of<'a, I>(
    makes_models: &MakesModels,
    makes: I,
    selected_models: &mut BTreeSet<String>,
) where
    I: IntoIterator<Item = &'a String>,
{
    selected_models.extend(models_of(makes_models, makes));
}
