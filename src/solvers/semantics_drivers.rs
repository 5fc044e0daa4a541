use super::{
    AcceptAllFilter, DefenseFixpointFilter, ExtensionComputer, Semantics, SetStableFilter,
    SubsetOfAllFilter,
};
use crate::aba::{AssumptionSet, Extension};
use anyhow::Result;

/// The strategy associated with a semantics.
///
/// A set is an extension of a semantics iff it is admissible and satisfies the extra burden of the driver.
/// Drivers also give the closed attackers considered when building dialectical trees,
/// and the way the extensions are computed.
pub trait SemanticsDriver {
    /// Returns the semantics handled by this driver.
    fn semantics(&self) -> Semantics;

    /// Returns the closed attackers of an assumption the proponent must answer to.
    fn closed_attackers(&self, computer: &mut ExtensionComputer, alpha: usize) -> Vec<AssumptionSet> {
        computer.reasoner().closed_attackers_unchecked(alpha)
    }

    /// Checks the predicate an admissible set must satisfy to be an extension.
    fn extra_burden(&self, computer: &mut ExtensionComputer, delta: &AssumptionSet) -> Result<bool>;

    /// Computes all the extensions.
    ///
    /// This function is called by [ExtensionComputer::extensions], which caches its results.
    fn extensions(&self, computer: &mut ExtensionComputer) -> Result<Vec<Extension>>;
}

impl Semantics {
    /// Returns the driver associated with this semantics.
    pub fn driver(&self) -> &'static dyn SemanticsDriver {
        match self {
            Semantics::Admissible => &AdmissibleDriver,
            Semantics::Complete => &CompleteDriver,
            Semantics::Preferred => &PreferredDriver,
            Semantics::Stable => &StableDriver,
            Semantics::WellFounded => &WellFoundedDriver,
            Semantics::Ideal => &IdealDriver,
        }
    }
}

struct AdmissibleDriver;

impl SemanticsDriver for AdmissibleDriver {
    fn semantics(&self) -> Semantics {
        Semantics::Admissible
    }

    fn extra_burden(&self, _computer: &mut ExtensionComputer, _delta: &AssumptionSet) -> Result<bool> {
        Ok(true)
    }

    fn extensions(&self, computer: &mut ExtensionComputer) -> Result<Vec<Extension>> {
        computer.enumerate(&mut AcceptAllFilter, false)
    }
}

struct CompleteDriver;

impl SemanticsDriver for CompleteDriver {
    fn semantics(&self) -> Semantics {
        Semantics::Complete
    }

    fn extra_burden(&self, computer: &mut ExtensionComputer, delta: &AssumptionSet) -> Result<bool> {
        Ok(computer.reasoner().is_defense_fixpoint_unchecked(delta))
    }

    fn extensions(&self, computer: &mut ExtensionComputer) -> Result<Vec<Extension>> {
        computer.enumerate(&mut DefenseFixpointFilter, false)
    }
}

struct PreferredDriver;

impl SemanticsDriver for PreferredDriver {
    fn semantics(&self) -> Semantics {
        Semantics::Preferred
    }

    fn extra_burden(&self, computer: &mut ExtensionComputer, delta: &AssumptionSet) -> Result<bool> {
        let preferred = computer.extensions(Semantics::Preferred)?;
        Ok(!preferred.iter().any(|p| delta.is_strict_subset(p)))
    }

    fn extensions(&self, computer: &mut ExtensionComputer) -> Result<Vec<Extension>> {
        computer.enumerate(&mut AcceptAllFilter, true)
    }
}

struct StableDriver;

impl SemanticsDriver for StableDriver {
    fn semantics(&self) -> Semantics {
        Semantics::Stable
    }

    fn closed_attackers(&self, _computer: &mut ExtensionComputer, _alpha: usize) -> Vec<AssumptionSet> {
        vec![]
    }

    fn extra_burden(&self, computer: &mut ExtensionComputer, delta: &AssumptionSet) -> Result<bool> {
        Ok(computer.reasoner().is_set_stable_unchecked(delta))
    }

    fn extensions(&self, computer: &mut ExtensionComputer) -> Result<Vec<Extension>> {
        computer.enumerate(&mut SetStableFilter, false)
    }
}

struct WellFoundedDriver;

impl WellFoundedDriver {
    fn well_founded(computer: &mut ExtensionComputer) -> Result<Option<Extension>> {
        let complete = computer.extensions(Semantics::Complete)?;
        let mut iter = complete.into_iter();
        Ok(iter
            .next()
            .map(|first| iter.fold(first, |acc, e| acc.intersection(&e))))
    }
}

impl SemanticsDriver for WellFoundedDriver {
    fn semantics(&self) -> Semantics {
        Semantics::WellFounded
    }

    fn extra_burden(&self, computer: &mut ExtensionComputer, delta: &AssumptionSet) -> Result<bool> {
        Ok(Self::well_founded(computer)?.as_ref() == Some(delta))
    }

    fn extensions(&self, computer: &mut ExtensionComputer) -> Result<Vec<Extension>> {
        Ok(Self::well_founded(computer)?.into_iter().collect())
    }
}

struct IdealDriver;

impl SemanticsDriver for IdealDriver {
    fn semantics(&self) -> Semantics {
        Semantics::Ideal
    }

    fn extra_burden(&self, computer: &mut ExtensionComputer, delta: &AssumptionSet) -> Result<bool> {
        let preferred = computer.extensions(Semantics::Preferred)?;
        if preferred.is_empty() || !preferred.iter().all(|p| delta.is_subset(p)) {
            return Ok(false);
        }
        let ideal = computer.extensions(Semantics::Ideal)?;
        Ok(!ideal.iter().any(|i| delta.is_strict_subset(i)))
    }

    fn extensions(&self, computer: &mut ExtensionComputer) -> Result<Vec<Extension>> {
        let preferred = computer.extensions(Semantics::Preferred)?;
        if preferred.is_empty() {
            return Ok(vec![]);
        }
        computer.enumerate(&mut SubsetOfAllFilter::new(preferred), true)
    }
}
