use super::{
    CandidateFilter, EngineKind, EnumerationOptions, ExhaustiveEnumerator, ExtensionEnumerator,
    SatEnumerator, SearchListener, SearchStats, Semantics, TopKResult, TopKSearch,
};
use crate::{
    aba::{AssumptionSet, BipolarABAFramework, Extension, Reasoner},
    sat::{DefaultSatSolverFactory, SatSolverFactory},
};
use anyhow::Result;
use log::info;
use std::{collections::HashMap, rc::Rc};

/// The entry point for the computation of extensions and acceptance statuses.
///
/// A computer owns a [Reasoner] and the extensions computed so far, by semantics.
/// Since a framework is immutable, these results are kept for the lifetime of the computer.
///
/// The enumeration algorithm is given by the [EnumerationOptions].
/// Both algorithms give the same results.
///
/// # Example
///
/// ```
/// # use crubaba::aba::{BipolarABAFramework, Literal, Rule};
/// # use crubaba::solvers::{ExtensionComputer, Semantics};
/// let lit = |k: &str| Literal::assumption(k);
/// let framework = BipolarABAFramework::new(
///     [lit("a"), lit("b")],
///     [(lit("a"), lit("not_a")), (lit("b"), lit("not_b"))],
///     [Rule::new(lit("not_a"), lit("b")), Rule::new(lit("not_b"), lit("a"))],
/// ).unwrap();
/// let mut computer = ExtensionComputer::new(&framework);
/// assert_eq!(2, computer.extensions(Semantics::Preferred).unwrap().len());
/// assert!(computer.is_credulously_accepted(Semantics::Stable, "a").unwrap());
/// assert!(!computer.is_skeptically_accepted(Semantics::Stable, "a").unwrap());
/// ```
pub struct ExtensionComputer<'a> {
    reasoner: Reasoner<'a>,
    options: EnumerationOptions,
    solver_factory: Box<dyn SatSolverFactory>,
    listeners: Vec<Rc<dyn SearchListener>>,
    extensions_cache: HashMap<Semantics, Vec<Extension>>,
    stats: SearchStats,
}

impl<'a> ExtensionComputer<'a> {
    /// Builds a new computer using the default options.
    pub fn new(framework: &'a BipolarABAFramework) -> Self {
        Self::new_with_options(framework, EnumerationOptions::default())
    }

    /// Builds a new computer using the given options.
    pub fn new_with_options(framework: &'a BipolarABAFramework, options: EnumerationOptions) -> Self {
        Self {
            reasoner: Reasoner::new(framework),
            options,
            solver_factory: Box::new(DefaultSatSolverFactory),
            listeners: vec![],
            extensions_cache: HashMap::new(),
            stats: SearchStats::default(),
        }
    }

    /// Sets the factory used to get SAT solvers.
    pub fn set_sat_solver_factory(&mut self, solver_factory: Box<dyn SatSolverFactory>) {
        self.solver_factory = solver_factory;
    }

    /// Adds a listener warned about the progress of the searches.
    pub fn add_search_listener(&mut self, listener: Rc<dyn SearchListener>) {
        self.listeners.push(listener);
    }

    /// Returns the framework under consideration.
    pub fn framework(&self) -> &'a BipolarABAFramework {
        self.reasoner.framework()
    }

    /// Returns the reasoner used by this computer.
    pub fn reasoner(&mut self) -> &mut Reasoner<'a> {
        &mut self.reasoner
    }

    /// Returns the options of this computer.
    pub fn options(&self) -> EnumerationOptions {
        self.options
    }

    /// Returns the cumulated statistics of the searches made so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Enumerates the admissible sets kept by a filter, optionally keeping only the maximal ones.
    ///
    /// Results are not cached.
    pub fn enumerate(
        &mut self,
        filter: &mut dyn CandidateFilter,
        need_maximal: bool,
    ) -> Result<Vec<Extension>> {
        let mut enumerator: Box<dyn ExtensionEnumerator + '_> = match self.options.engine {
            EngineKind::Exhaustive => Box::<ExhaustiveEnumerator>::default(),
            EngineKind::Sat => Box::new(SatEnumerator::new(
                self.solver_factory.as_ref(),
                self.options.use_closure_implications,
            )),
        };
        self.listeners
            .iter()
            .for_each(|l| enumerator.add_listener(Rc::clone(l)));
        let result = enumerator.enumerate(&mut self.reasoner, filter, need_maximal)?;
        self.stats.merge(&result.stats);
        Ok(result.extensions)
    }

    /// Enumerates the admissible sets kept by a filter, following the maximality requirement of the options.
    pub fn enumerate_filtered(&mut self, filter: &mut dyn CandidateFilter) -> Result<Vec<Extension>> {
        let need_maximal = self.options.need_maximal;
        self.enumerate(filter, need_maximal)
    }

    /// Returns the extensions of a semantics, in increasing order.
    pub fn extensions(&mut self, semantics: Semantics) -> Result<Vec<Extension>> {
        if let Some(extensions) = self.extensions_cache.get(&semantics) {
            return Ok(extensions.clone());
        }
        let extensions = semantics.driver().extensions(self)?;
        info!(
            "found {} {} extension(s)",
            extensions.len(),
            semantics.as_ref()
        );
        self.extensions_cache
            .insert(semantics, extensions.clone());
        Ok(extensions)
    }

    /// Returns the admissible sets.
    pub fn admissible_extensions(&mut self) -> Result<Vec<Extension>> {
        self.extensions(Semantics::Admissible)
    }

    /// Returns the complete extensions.
    pub fn complete_extensions(&mut self) -> Result<Vec<Extension>> {
        self.extensions(Semantics::Complete)
    }

    /// Returns the preferred extensions.
    pub fn preferred_extensions(&mut self) -> Result<Vec<Extension>> {
        self.extensions(Semantics::Preferred)
    }

    /// Returns the set-stable extensions.
    pub fn stable_extensions(&mut self) -> Result<Vec<Extension>> {
        self.extensions(Semantics::Stable)
    }

    /// Returns the well-founded extension, or [Option::None] if there is no complete extension.
    pub fn well_founded_extension(&mut self) -> Result<Option<Extension>> {
        Ok(self.extensions(Semantics::WellFounded)?.into_iter().next())
    }

    /// Returns the ideal extensions.
    pub fn ideal_extensions(&mut self) -> Result<Vec<Extension>> {
        self.extensions(Semantics::Ideal)
    }

    /// Checks the extra burden of a semantics on a set, regardless of its admissibility.
    pub fn extra_burden(&mut self, semantics: Semantics, delta: &AssumptionSet) -> Result<bool> {
        self.framework().check_set(delta, "extra burden check")?;
        semantics.driver().extra_burden(self, delta)
    }

    /// Checks if a set is an extension of a semantics, that is if it is admissible and satisfies the extra burden.
    pub fn is_extension(&mut self, semantics: Semantics, delta: &AssumptionSet) -> Result<bool> {
        Ok(self.reasoner.is_admissible(delta)? && self.extra_burden(semantics, delta)?)
    }

    /// Checks if a set is admissible.
    pub fn is_admissible(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.is_extension(Semantics::Admissible, delta)
    }

    /// Checks if a set is a complete extension.
    pub fn is_complete(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.is_extension(Semantics::Complete, delta)
    }

    /// Checks if a set is a preferred extension.
    pub fn is_preferred(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.is_extension(Semantics::Preferred, delta)
    }

    /// Checks if a set is a set-stable extension.
    pub fn is_stable(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.is_extension(Semantics::Stable, delta)
    }

    /// Checks if a set is the well-founded extension.
    pub fn is_well_founded(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.is_extension(Semantics::WellFounded, delta)
    }

    /// Checks if a set is an ideal extension.
    pub fn is_ideal(&mut self, delta: &AssumptionSet) -> Result<bool> {
        self.is_extension(Semantics::Ideal, delta)
    }

    /// Checks the credulous acceptance of an assumption.
    pub fn is_credulously_accepted(&mut self, semantics: Semantics, key: &str) -> Result<bool> {
        Ok(self
            .is_credulously_accepted_with_certificate(semantics, key)?
            .0)
    }

    /// Checks the credulous acceptance of an assumption, and provides a certificate if it is the case.
    ///
    /// The certificate is an extension containing the assumption.
    pub fn is_credulously_accepted_with_certificate(
        &mut self,
        semantics: Semantics,
        key: &str,
    ) -> Result<(bool, Option<Extension>)> {
        let id = self
            .framework()
            .check_assumption(key, "credulous acceptance check")?;
        let certificate = self
            .extensions(semantics)?
            .into_iter()
            .find(|e| e.contains(id));
        Ok((certificate.is_some(), certificate))
    }

    /// Checks the skeptical acceptance of an assumption.
    ///
    /// When the semantics admits no extension, any assumption is skeptically accepted.
    pub fn is_skeptically_accepted(&mut self, semantics: Semantics, key: &str) -> Result<bool> {
        Ok(self
            .is_skeptically_accepted_with_certificate(semantics, key)?
            .0)
    }

    /// Checks the skeptical acceptance of an assumption, and provides a certificate if it is not the case.
    ///
    /// The certificate is an extension that does not contain the assumption.
    pub fn is_skeptically_accepted_with_certificate(
        &mut self,
        semantics: Semantics,
        key: &str,
    ) -> Result<(bool, Option<Extension>)> {
        let id = self
            .framework()
            .check_assumption(key, "skeptical acceptance check")?;
        let certificate = self
            .extensions(semantics)?
            .into_iter()
            .find(|e| !e.contains(id));
        Ok((certificate.is_none(), certificate))
    }

    fn top_k(&mut self, k: usize, maximal_only: bool) -> Result<TopKResult> {
        let mut search = TopKSearch::new(self.solver_factory.as_ref());
        self.listeners
            .iter()
            .for_each(|l| search.add_listener(Rc::clone(l)));
        let result = search.search(&mut self.reasoner, k, maximal_only)?;
        self.stats.merge(&result.stats);
        Ok(result)
    }

    /// Returns up to `k` admissible sets of maximal size, by non-increasing size.
    pub fn admissible_top_k(&mut self, k: usize) -> Result<TopKResult> {
        self.top_k(k, false)
    }

    /// Returns up to `k` preferred extensions of maximal size, by non-increasing size.
    pub fn preferred_top_k(&mut self, k: usize) -> Result<TopKResult> {
        self.top_k(k, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aba::test_frameworks::*, solvers::AcceptAllFilter};
    use paste::paste;

    fn keys<'f>(fw: &'f BipolarABAFramework, extensions: &[Extension]) -> Vec<Vec<&'f str>> {
        extensions.iter().map(|e| e.keys(fw)).collect()
    }

    fn computer(fw: &BipolarABAFramework, engine: EngineKind) -> ExtensionComputer<'_> {
        ExtensionComputer::new_with_options(fw, EnumerationOptions::default().with_engine(engine))
    }

    macro_rules! engines_agree {
        ($semantics:ident) => {
            paste! {
                #[test]
                fn [<test_engines_agree_ $semantics:snake>]() {
                    for fw in [scenario_a(), scenario_b(), scenario_c(), mixed_framework(), defended_chain()] {
                        let exhaustive = computer(&fw, EngineKind::Exhaustive).extensions(Semantics::$semantics).unwrap();
                        let sat = computer(&fw, EngineKind::Sat).extensions(Semantics::$semantics).unwrap();
                        let mut unclosed_computer = ExtensionComputer::new_with_options(
                            &fw,
                            EnumerationOptions::default().with_closure_implications(false),
                        );
                        let unclosed = unclosed_computer.extensions(Semantics::$semantics).unwrap();
                        assert_eq!(exhaustive, sat);
                        assert_eq!(exhaustive, unclosed);
                    }
                }
            }
        };
    }

    engines_agree!(Admissible);
    engines_agree!(Complete);
    engines_agree!(Preferred);
    engines_agree!(Stable);
    engines_agree!(WellFounded);
    engines_agree!(Ideal);

    // c attacks b, b attacks a, d supports c
    fn defended_chain() -> BipolarABAFramework {
        framework_from(&["a", "b", "c", "d"], &[], &[("c", "d")], &[("a", "b"), ("b", "c")])
    }

    #[test]
    fn test_scenario_a() {
        let fw = scenario_a();
        let mut c = ExtensionComputer::new(&fw);
        assert_eq!(vec![vec![], vec!["b"]], keys(&fw, &c.admissible_extensions().unwrap()));
        assert_eq!(vec![vec!["b"]], keys(&fw, &c.preferred_extensions().unwrap()));
        assert_eq!(vec![vec!["b"]], keys(&fw, &c.complete_extensions().unwrap()));
        assert_eq!(vec![vec!["b"]], keys(&fw, &c.stable_extensions().unwrap()));
        assert_eq!(
            Some(vec!["b"]),
            c.well_founded_extension().unwrap().map(|e| e.keys(&fw))
        );
        assert_eq!(vec![vec!["b"]], keys(&fw, &c.ideal_extensions().unwrap()));
        assert!(!c.is_admissible(&fw.assumption_set(&["a"]).unwrap()).unwrap());
    }

    #[test]
    fn test_scenario_b() {
        let fw = scenario_b();
        let mut c = ExtensionComputer::new(&fw);
        assert_eq!(
            vec![vec![], vec!["a"], vec!["b"]],
            keys(&fw, &c.admissible_extensions().unwrap())
        );
        assert_eq!(vec![vec!["a"], vec!["b"]], keys(&fw, &c.preferred_extensions().unwrap()));
        assert_eq!(vec![vec!["a"], vec!["b"]], keys(&fw, &c.stable_extensions().unwrap()));
        assert_eq!(
            vec![vec![], vec!["a"], vec!["b"]],
            keys(&fw, &c.complete_extensions().unwrap())
        );
        assert_eq!(
            Some(AssumptionSet::new()),
            c.well_founded_extension().unwrap()
        );
        assert_eq!(vec![Vec::<&str>::new()], keys(&fw, &c.ideal_extensions().unwrap()));
    }

    #[test]
    fn test_scenario_c() {
        let fw = scenario_c();
        let mut c = ExtensionComputer::new(&fw);
        let all = vec![vec!["a", "b", "c"]];
        for s in [
            Semantics::Complete,
            Semantics::Preferred,
            Semantics::Stable,
            Semantics::WellFounded,
            Semantics::Ideal,
        ] {
            assert_eq!(all, keys(&fw, &c.extensions(s).unwrap()));
        }
        assert_eq!(4, c.admissible_extensions().unwrap().len());
    }

    #[test]
    fn test_no_complete_extension() {
        let fw = mixed_framework();
        let mut c = ExtensionComputer::new(&fw);
        assert!(c.complete_extensions().unwrap().is_empty());
        assert_eq!(None, c.well_founded_extension().unwrap());
        assert!(!c.is_well_founded(&AssumptionSet::new()).unwrap());
        assert_eq!(
            vec![vec!["b", "f"], vec!["d", "f"]],
            keys(&fw, &c.preferred_extensions().unwrap())
        );
        assert_eq!(vec![vec!["f"]], keys(&fw, &c.ideal_extensions().unwrap()));
    }

    #[test]
    fn test_enumerate_filtered_follows_maximality_option() {
        let fw = defended_chain();
        for engine in [EngineKind::Exhaustive, EngineKind::Sat] {
            let options = EnumerationOptions::default().with_engine(engine);
            let mut all = ExtensionComputer::new_with_options(&fw, options);
            let admissible = all.admissible_extensions().unwrap();
            assert_eq!(admissible, all.enumerate_filtered(&mut AcceptAllFilter).unwrap());
            let mut maximal = ExtensionComputer::new_with_options(&fw, options.with_maximality(true));
            assert_eq!(
                vec![vec!["a", "c", "d"]],
                keys(&fw, &maximal.enumerate_filtered(&mut AcceptAllFilter).unwrap())
            );
        }
    }

    #[test]
    fn test_complete_extensions_are_admissible_and_contain_well_founded() {
        let fw = defended_chain();
        let mut c = ExtensionComputer::new(&fw);
        let complete = c.complete_extensions().unwrap();
        let wf = c.well_founded_extension().unwrap().unwrap();
        assert!(c.is_complete(&wf).unwrap());
        for e in complete.iter() {
            assert!(c.reasoner().is_admissible(e).unwrap());
            assert!(wf.is_subset(e));
        }
        assert_eq!(vec!["a", "c", "d"], wf.keys(&fw));
    }

    #[test]
    fn test_preferred_properties() {
        let fw = mixed_framework();
        let mut c = ExtensionComputer::new(&fw);
        let preferred = c.preferred_extensions().unwrap();
        for a in c.admissible_extensions().unwrap() {
            assert!(preferred.iter().any(|p| a.is_subset(p)));
        }
        for p in preferred.iter() {
            assert!(c.is_preferred(p).unwrap());
        }
        let not_maximal = fw.assumption_set(&["a", "b"]).unwrap();
        assert!(!c.is_preferred(&not_maximal).unwrap());
    }

    #[test]
    fn test_ideal_properties() {
        let fw = defended_chain();
        let mut c = ExtensionComputer::new(&fw);
        let preferred = c.preferred_extensions().unwrap();
        for i in c.ideal_extensions().unwrap() {
            assert!(preferred.iter().all(|p| i.is_subset(p)));
            assert!(c.is_ideal(&i).unwrap());
        }
        assert!(!c.is_ideal(&AssumptionSet::new()).unwrap());
    }

    #[test]
    fn test_stable_burden_without_admissibility() {
        let fw = scenario_c();
        let mut c = ExtensionComputer::new(&fw);
        let not_closed = fw.assumption_set(&["a"]).unwrap();
        assert!(!c.extra_burden(Semantics::Stable, &not_closed).unwrap());
        assert!(c
            .extra_burden(Semantics::Stable, &fw.all_assumptions())
            .unwrap());
    }

    #[test]
    fn test_acceptance() {
        let fw = scenario_a();
        let mut c = ExtensionComputer::new(&fw);
        assert_eq!(
            (true, Some(fw.assumption_set(&["b"]).unwrap())),
            c.is_credulously_accepted_with_certificate(Semantics::Admissible, "b")
                .unwrap()
        );
        assert!(!c.is_credulously_accepted(Semantics::Preferred, "a").unwrap());
        assert!(c.is_skeptically_accepted(Semantics::Complete, "b").unwrap());
        assert_eq!(
            (false, Some(AssumptionSet::new())),
            c.is_skeptically_accepted_with_certificate(Semantics::Admissible, "b")
                .unwrap()
        );
        assert!(c
            .is_credulously_accepted(Semantics::Admissible, "not_a")
            .is_err());
    }

    #[test]
    fn test_skeptical_without_extension() {
        let fw = mixed_framework();
        let mut c = ExtensionComputer::new(&fw);
        assert!(c.is_skeptically_accepted(Semantics::Complete, "a").unwrap());
    }

    #[test]
    fn test_cache() {
        let fw = scenario_b();
        let mut c = ExtensionComputer::new(&fw);
        c.preferred_extensions().unwrap();
        let calls = c.stats().n_solver_calls;
        c.preferred_extensions().unwrap();
        assert_eq!(calls, c.stats().n_solver_calls);
    }

    #[test]
    fn test_preferred_top_k() {
        let fw = defended_chain();
        let mut c = ExtensionComputer::new(&fw);
        let top = c.preferred_top_k(5).unwrap();
        assert_eq!(c.preferred_extensions().unwrap(), top.extensions);
        let top_adm = c.admissible_top_k(1).unwrap();
        assert_eq!(1, top_adm.extensions.len());
        assert_eq!(top.max_size, top_adm.max_size);
    }

    #[test]
    fn test_foreign_set() {
        let fw = scenario_a();
        let mut c = ExtensionComputer::new(&fw);
        let foreign = scenario_c().all_assumptions();
        assert!(c.is_complete(&foreign).is_err());
    }
}
