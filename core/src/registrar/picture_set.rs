//! Several independent pictures of the same configuration

use super::picture::Picture;
use super::{ConstructionBatch, RegistrationVerdict};
use crate::error::{GenerationError, GenerationResult};
use crate::geometry::{random_loose_realization, AnalyticObject};
use crate::ir::{flatten_arguments, LooseObjectLayout, ObjectId};
use rand::Rng;

/// Result of building a batch in one picture
#[derive(Debug, Clone, PartialEq)]
enum PictureOutcome {
    Unconstructible,
    Constructed {
        values: Vec<AnalyticObject>,
        duplicates: Vec<(ObjectId, ObjectId)>,
    },
}

/// Reconciled result of building a batch in every picture
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Every picture agrees; `values` holds the batch's values per picture
    Consistent {
        verdict: RegistrationVerdict,
        values: Vec<Vec<AnalyticObject>>,
    },

    /// Pictures disagree on constructibility or duplicates
    Inconsistent,
}

/// The picture set a registrar validates against
#[derive(Debug, Clone, Default)]
pub struct Pictures {
    pictures: Vec<Picture>,
}

impl Pictures {
    /// Draw `count` fresh realizations of the loose objects
    pub fn draw<R: Rng + ?Sized>(
        layout: &LooseObjectLayout,
        loose_objects: &[ObjectId],
        count: usize,
        rng: &mut R,
    ) -> Self {
        let pictures = (0..count)
            .map(|_| {
                let values = random_loose_realization(layout, rng);
                Self::picture_of(loose_objects, values)
            })
            .collect();
        Self { pictures }
    }

    /// Pictures with the given loose values
    pub fn from_values(loose_objects: &[ObjectId], realizations: Vec<Vec<AnalyticObject>>) -> Self {
        let pictures = realizations
            .into_iter()
            .map(|values| Self::picture_of(loose_objects, values))
            .collect();
        Self { pictures }
    }

    fn picture_of(loose_objects: &[ObjectId], values: Vec<AnalyticObject>) -> Picture {
        let mut picture = Picture::new();
        for (&id, value) in loose_objects.iter().zip(values) {
            picture.add(id, value);
        }
        picture
    }

    /// Build a batch in every picture and reconcile the outcomes
    ///
    /// Does not modify any picture.
    pub fn evaluate(&self, batch: &ConstructionBatch) -> GenerationResult<Evaluation> {
        let outcomes = self
            .pictures
            .iter()
            .map(|picture| Self::build(picture, batch))
            .collect::<GenerationResult<Vec<_>>>()?;

        let Some(first) = outcomes.first() else {
            return Ok(Evaluation::Inconsistent);
        };

        let agree = outcomes.iter().all(|outcome| match (first, outcome) {
            (PictureOutcome::Unconstructible, PictureOutcome::Unconstructible) => true,
            (
                PictureOutcome::Constructed { duplicates: a, .. },
                PictureOutcome::Constructed { duplicates: b, .. },
            ) => a == b,
            _ => false,
        });
        if !agree {
            return Ok(Evaluation::Inconsistent);
        }

        let duplicates = match first {
            PictureOutcome::Unconstructible => None,
            PictureOutcome::Constructed { duplicates, .. } => Some(duplicates.clone()),
        };

        let evaluation = match duplicates {
            None => Evaluation::Consistent {
                verdict: RegistrationVerdict::Unconstructible,
                values: Vec::new(),
            },
            Some(duplicates) => {
                let verdict = if duplicates.is_empty() {
                    RegistrationVerdict::Ok
                } else {
                    RegistrationVerdict::Duplicate(duplicates)
                };
                let values = outcomes
                    .into_iter()
                    .filter_map(|outcome| match outcome {
                        PictureOutcome::Constructed { values, .. } => Some(values),
                        PictureOutcome::Unconstructible => None,
                    })
                    .collect();
                Evaluation::Consistent { verdict, values }
            }
        };
        Ok(evaluation)
    }

    fn build(picture: &Picture, batch: &ConstructionBatch) -> GenerationResult<PictureOutcome> {
        let inputs = flatten_arguments(&batch.arguments)
            .into_iter()
            .map(|id| picture.require(id))
            .collect::<GenerationResult<Vec<_>>>()?;

        let Some(outputs) = batch.construction.realize(&inputs) else {
            return Ok(PictureOutcome::Unconstructible);
        };
        let values = batch
            .objects
            .iter()
            .map(|&(output, _)| {
                outputs.get(output).copied().ok_or_else(|| GenerationError::InvalidOutput {
                    construction: batch.construction.name().to_string(),
                    output,
                })
            })
            .collect::<GenerationResult<Vec<_>>>()?;

        let mut duplicates = Vec::new();
        for (i, (&(_, id), value)) in batch.objects.iter().zip(&values).enumerate() {
            let older = picture.find(value).or_else(|| {
                // Outputs of one call may coincide with each other
                values[..i]
                    .iter()
                    .position(|sibling| sibling.approx_eq(value))
                    .map(|j| batch.objects[j].1)
            });
            if let Some(older) = older {
                duplicates.push((id, older));
            }
        }

        Ok(PictureOutcome::Constructed { values, duplicates })
    }

    /// Store the values of an accepted batch
    pub fn commit(&mut self, batch: &ConstructionBatch, values: Vec<Vec<AnalyticObject>>) {
        for (picture, values) in self.pictures.iter_mut().zip(values) {
            for (&(_, id), value) in batch.objects.iter().zip(values) {
                picture.add(id, value);
            }
        }
    }

    /// Record value duplicates found for a rejected batch
    pub fn mark_duplicates(&mut self, pairs: &[(ObjectId, ObjectId)]) {
        for picture in &mut self.pictures {
            for &(newer, older) in pairs {
                picture.mark_duplicate(newer, older);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Picture> {
        self.pictures.iter()
    }

    pub fn first(&self) -> Option<&Picture> {
        self.pictures.first()
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2D;
    use crate::ir::{Argument, PredefinedConstruction};

    fn point(x: f64, y: f64) -> AnalyticObject {
        AnalyticObject::Point(Point2D::new(x, y))
    }

    fn ids(n: u32) -> Vec<ObjectId> {
        (0..n).map(ObjectId).collect()
    }

    fn batch(construction: PredefinedConstruction, members: &[u32], object: u32) -> ConstructionBatch {
        ConstructionBatch {
            construction: construction.into(),
            arguments: vec![Argument::set(
                members.iter().map(|&i| Argument::Object(ObjectId(i))).collect(),
            )],
            objects: vec![(0, ObjectId(object))],
        }
    }

    #[test]
    fn test_consistent_ok() {
        let pictures = Pictures::from_values(
            &ids(3),
            vec![
                vec![point(0.0, 0.0), point(2.0, 0.0), point(0.0, 2.0)],
                vec![point(1.0, 1.0), point(5.0, 2.0), point(-3.0, 4.0)],
            ],
        );
        let evaluation = pictures.evaluate(&batch(PredefinedConstruction::Midpoint, &[0, 1], 3)).unwrap();

        match evaluation {
            Evaluation::Consistent { verdict, values } => {
                assert_eq!(verdict, RegistrationVerdict::Ok);
                assert_eq!(values.len(), 2);
                assert!(values[0][0].approx_eq(&point(1.0, 0.0)));
            }
            Evaluation::Inconsistent => panic!("expected a consistent evaluation"),
        }
    }

    #[test]
    fn test_disagreement_is_inconsistent() {
        // Collinear in the first picture only
        let pictures = Pictures::from_values(
            &ids(3),
            vec![
                vec![point(0.0, 0.0), point(2.0, 0.0), point(4.0, 0.0)],
                vec![point(1.0, 1.0), point(5.0, 2.0), point(-3.0, 4.0)],
            ],
        );
        let evaluation = pictures
            .evaluate(&batch(PredefinedConstruction::Circumcenter, &[0, 1, 2], 3))
            .unwrap();
        assert_eq!(evaluation, Evaluation::Inconsistent);
    }

    #[test]
    fn test_duplicate_detection_and_commit() {
        let mut pictures = Pictures::from_values(
            &ids(3),
            vec![vec![point(0.0, 0.0), point(2.0, 0.0), point(1.0, 0.0)]],
        );
        let duplicate = pictures.evaluate(&batch(PredefinedConstruction::Midpoint, &[0, 1], 3)).unwrap();
        assert!(matches!(
            duplicate,
            Evaluation::Consistent {
                verdict: RegistrationVerdict::Duplicate(ref pairs),
                ..
            } if pairs == &vec![(ObjectId(3), ObjectId(2))]
        ));

        let fresh = batch(PredefinedConstruction::Midpoint, &[0, 2], 4);
        let Evaluation::Consistent { values, .. } = pictures.evaluate(&fresh).unwrap() else {
            panic!("expected a consistent evaluation");
        };
        pictures.commit(&fresh, values);
        assert!(pictures.first().unwrap().contains(ObjectId(4)));
    }
}
