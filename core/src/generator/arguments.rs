//! Argument enumeration
//!
//! Binds existing objects to a construction's parameter signature in every
//! distinct way. Argument lists are compared structurally, so reordering
//! the members of a set parameter never produces a new list.

use crate::ir::{Argument, ConstructionParameter, ObjectId, ObjectKind, ObjectPool};
use rustc_hash::FxHashSet;

/// All distinct argument lists for `signature` drawn from `pool`
///
/// Results keep the order in which they were first produced.
pub fn generate_arguments(pool: &ObjectPool, signature: &[ConstructionParameter]) -> Vec<Vec<Argument>> {
    let mut needed = [0usize; 3];
    for parameter in signature {
        parameter.count_kinds(&mut needed);
    }

    if ObjectKind::ALL
        .iter()
        .any(|kind| pool.of_kind(*kind).len() < needed[kind.index()])
    {
        return Vec::new();
    }

    let per_kind: Vec<Vec<Vec<ObjectId>>> = ObjectKind::ALL
        .iter()
        .map(|kind| variations(pool.of_kind(*kind), needed[kind.index()]))
        .collect();

    let mut seen: FxHashSet<Vec<Argument>> = FxHashSet::default();
    let mut results = Vec::new();
    let mut choice: Vec<&[ObjectId]> = Vec::with_capacity(per_kind.len());

    combine(&per_kind, &mut choice, &mut |selection: &[&[ObjectId]]| {
        let mut cursors = [0usize; 3];
        let arguments: Vec<Argument> = signature
            .iter()
            .map(|parameter| bind(parameter, selection, &mut cursors))
            .collect();
        if seen.insert(arguments.clone()) {
            results.push(arguments);
        }
    });

    results
}

/// Ordered selections of `count` distinct objects
fn variations(objects: &[ObjectId], count: usize) -> Vec<Vec<ObjectId>> {
    fn extend(
        objects: &[ObjectId],
        count: usize,
        used: &mut [bool],
        current: &mut Vec<ObjectId>,
        out: &mut Vec<Vec<ObjectId>>,
    ) {
        if current.len() == count {
            out.push(current.clone());
            return;
        }
        for i in 0..objects.len() {
            if !used[i] {
                used[i] = true;
                current.push(objects[i]);
                extend(objects, count, used, current, out);
                current.pop();
                used[i] = false;
            }
        }
    }

    let mut out = Vec::new();
    extend(
        objects,
        count,
        &mut vec![false; objects.len()],
        &mut Vec::with_capacity(count),
        &mut out,
    );
    out
}

/// Cartesian product of one variation per kind
fn combine<'a, F>(per_kind: &'a [Vec<Vec<ObjectId>>], choice: &mut Vec<&'a [ObjectId]>, emit: &mut F)
where
    F: FnMut(&[&'a [ObjectId]]),
{
    let depth = choice.len();
    if depth == per_kind.len() {
        emit(choice.as_slice());
        return;
    }
    for variation in &per_kind[depth] {
        choice.push(variation);
        combine(per_kind, choice, emit);
        choice.pop();
    }
}

/// Pull objects from the selection to fill one parameter
fn bind(parameter: &ConstructionParameter, selection: &[&[ObjectId]], cursors: &mut [usize; 3]) -> Argument {
    match parameter {
        ConstructionParameter::Object(kind) => {
            let k = kind.index();
            let id = selection[k][cursors[k]];
            cursors[k] += 1;
            Argument::Object(id)
        }
        ConstructionParameter::Set { parameter, count } => {
            Argument::set((0..*count).map(|_| bind(parameter, selection, cursors)).collect())
        }
    }
}
