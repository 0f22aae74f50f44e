//! Geometry registrar
//!
//! Validates batches of constructed objects against a set of independent
//! numeric pictures. Pictures that disagree are discarded and rebuilt from
//! fresh random loose objects by replaying every accepted batch.

pub mod picture;
pub mod picture_set;

pub use picture::Picture;
pub use picture_set::{Evaluation, Pictures};

use crate::error::{GenerationError, GenerationResult};
use crate::geometry::AnalyticObject;
use crate::ir::{Argument, Construction, LooseObjectLayout, ObjectId};
use crate::settings::GenerationSettings;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Outputs of one construction call
///
/// `objects` pairs an output index of the construction with the symbolic
/// object standing for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionBatch {
    pub construction: Construction,
    pub arguments: Vec<Argument>,
    pub objects: Vec<(usize, ObjectId)>,
}

/// Agreed outcome of registering a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationVerdict {
    Ok,
    Unconstructible,

    /// `(newer, older)` pairs of coinciding objects
    Duplicate(Vec<(ObjectId, ObjectId)>),
}

impl RegistrationVerdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, RegistrationVerdict::Ok)
    }
}

/// Picture set of one configuration plus the history needed to rebuild it
#[derive(Debug, Clone)]
pub struct GeometryRegistrar {
    layout: LooseObjectLayout,
    loose_objects: Vec<ObjectId>,
    history: Vec<ConstructionBatch>,
    pictures: Pictures,
    rng: SmallRng,
    number_of_pictures: usize,
    max_attempts: usize,
    reconstructions: usize,
    inconsistencies_resolved: usize,
}

impl GeometryRegistrar {
    /// Registrar with freshly drawn pictures of the loose objects
    pub fn new(
        layout: LooseObjectLayout,
        loose_objects: Vec<ObjectId>,
        settings: &GenerationSettings,
    ) -> GenerationResult<Self> {
        settings.validate()?;
        if loose_objects.len() != layout.len() {
            return Err(GenerationError::InvalidConfiguration(format!(
                "layout {layout:?} has {} loose objects, got {}",
                layout.len(),
                loose_objects.len()
            )));
        }

        let mut rng = SmallRng::seed_from_u64(settings.seed);
        let pictures = Pictures::draw(&layout, &loose_objects, settings.number_of_pictures, &mut rng);

        Ok(Self {
            layout,
            loose_objects,
            history: Vec::new(),
            pictures,
            rng,
            number_of_pictures: settings.number_of_pictures,
            max_attempts: settings.max_reconstruction_attempts,
            reconstructions: 0,
            inconsistencies_resolved: 0,
        })
    }

    /// Registrar starting from given loose values, one vector per picture
    ///
    /// Later reconstructions still draw at random.
    pub fn with_pictures(
        layout: LooseObjectLayout,
        loose_objects: Vec<ObjectId>,
        realizations: Vec<Vec<AnalyticObject>>,
        settings: &GenerationSettings,
    ) -> GenerationResult<Self> {
        let mut registrar = Self::new(layout, loose_objects, settings)?;
        registrar.number_of_pictures = realizations.len().max(1);
        registrar.pictures = Pictures::from_values(&registrar.loose_objects, realizations);
        Ok(registrar)
    }

    /// Register a batch, keeping its values if the verdict is `Ok`
    pub fn register(&mut self, batch: ConstructionBatch) -> GenerationResult<RegistrationVerdict> {
        let (verdict, values) = self.resolve(&batch)?;
        if verdict.is_ok() {
            self.commit(batch, values);
        }
        Ok(verdict)
    }

    /// Register a batch on a copy, leaving `self` unextended
    ///
    /// Returns the verdict and, for `Ok`, the extended registrar. `self` may
    /// still be rebuilt if its pictures turn out inconsistent.
    pub fn try_extend(
        &mut self,
        batch: &ConstructionBatch,
    ) -> GenerationResult<(RegistrationVerdict, Option<GeometryRegistrar>)> {
        let (verdict, values) = self.resolve(batch)?;
        if !verdict.is_ok() {
            return Ok((verdict, None));
        }
        let mut next = self.clone();
        next.commit(batch.clone(), values);
        Ok((verdict, Some(next)))
    }

    fn resolve(
        &mut self,
        batch: &ConstructionBatch,
    ) -> GenerationResult<(RegistrationVerdict, Vec<Vec<AnalyticObject>>)> {
        let mut attempts = 0;
        loop {
            match self.pictures.evaluate(batch)? {
                Evaluation::Consistent { verdict, values } => {
                    debug!(construction = %batch.construction, ?verdict, "batch registered");
                    if attempts > 0 {
                        self.inconsistencies_resolved += 1;
                    }
                    if let RegistrationVerdict::Duplicate(pairs) = &verdict {
                        self.pictures.mark_duplicates(pairs);
                    }
                    return Ok((verdict, values));
                }
                Evaluation::Inconsistent => {
                    warn!(
                        construction = %batch.construction,
                        attempts,
                        "pictures disagree, reconstructing"
                    );
                    self.reconstruct(&mut attempts)?;
                }
            }
        }
    }

    fn commit(&mut self, batch: ConstructionBatch, values: Vec<Vec<AnalyticObject>>) {
        self.pictures.commit(&batch, values);
        self.history.push(batch);
    }

    /// Redraw the loose objects and replay the history until it is consistent
    fn reconstruct(&mut self, attempts: &mut usize) -> GenerationResult<()> {
        loop {
            if *attempts >= self.max_attempts {
                return Err(GenerationError::InconsistencyLimit { attempts: *attempts });
            }
            *attempts += 1;
            self.reconstructions += 1;

            let mut pictures = Pictures::draw(
                &self.layout,
                &self.loose_objects,
                self.number_of_pictures,
                &mut self.rng,
            );
            if self.replay(&mut pictures)? {
                self.pictures = pictures;
                return Ok(());
            }
        }
    }

    fn replay(&self, pictures: &mut Pictures) -> GenerationResult<bool> {
        for batch in &self.history {
            match pictures.evaluate(batch)? {
                Evaluation::Consistent {
                    verdict: RegistrationVerdict::Ok,
                    values,
                } => pictures.commit(batch, values),
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    pub fn layout(&self) -> LooseObjectLayout {
        self.layout
    }

    pub fn loose_objects(&self) -> &[ObjectId] {
        &self.loose_objects
    }

    /// Accepted batches in registration order
    pub fn history(&self) -> &[ConstructionBatch] {
        &self.history
    }

    pub fn pictures(&self) -> &Pictures {
        &self.pictures
    }

    /// Number of picture reconstructions so far, inherited by copies
    pub fn reconstructions(&self) -> usize {
        self.reconstructions
    }

    /// Number of batches whose pictures disagreed and were rebuilt into
    /// agreement, however many redraws that took
    pub fn inconsistencies_resolved(&self) -> usize {
        self.inconsistencies_resolved
    }
}
