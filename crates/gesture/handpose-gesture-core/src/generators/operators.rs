use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index;
use rand::Rng;

use crate::declaration::GestureSet;
use crate::error::{GestureError, Result};
use crate::generators::{GenContext, ModuleGenerator, LOWEST_PRIORITY};

type Modules = Vec<Box<dyn ModuleGenerator>>;

fn checked(name: &str, modules: Modules, weight: f32) -> Result<Modules> {
    if modules.is_empty() {
        return Err(GestureError::generator(name, "operator needs at least one module"));
    }
    if weight < 0.0 {
        return Err(GestureError::generator(
            name,
            format!("weight {weight} must be non-negative"),
        ));
    }
    if let Some(bad) = modules.iter().find(|m| m.weight() < 0.0) {
        return Err(GestureError::generator(
            name,
            format!("module weight {} must be non-negative", bad.weight()),
        ));
    }
    Ok(modules)
}

/// Generate `picked` in priority order and merge the results.
fn run(
    modules: &[Box<dyn ModuleGenerator>],
    picked: &mut [usize],
    ctx: &mut GenContext,
) -> Result<GestureSet> {
    picked.sort_by_key(|&i| modules[i].priority());
    let mut out = GestureSet::new();
    for &i in picked.iter() {
        out.merge(modules[i].generate(ctx)?)?;
    }
    Ok(out)
}

macro_rules! operator {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            modules: Modules,
            weight: f32,
            priority: u32,
        }

        impl $name {
            pub fn new(modules: Modules) -> Result<Self> {
                Self::with_weight(modules, 1.0, LOWEST_PRIORITY)
            }

            pub fn with_weight(modules: Modules, weight: f32, priority: u32) -> Result<Self> {
                Ok(Self {
                    modules: checked(stringify!($name), modules, weight)?,
                    weight,
                    priority,
                })
            }

            pub fn modules(&self) -> &[Box<dyn ModuleGenerator>] {
                &self.modules
            }
        }
    };
}

operator!(
    /// Runs every module.
    AllOf
);
operator!(
    /// Runs one module chosen by weight.
    OneOf
);
operator!(
    /// Runs a uniformly sized random subset of the modules.
    SomeOf
);

impl ModuleGenerator for AllOf {
    fn generate(&self, ctx: &mut GenContext) -> Result<GestureSet> {
        let mut picked: Vec<usize> = (0..self.modules.len()).collect();
        run(&self.modules, &mut picked, ctx)
    }

    fn weight(&self) -> f32 {
        self.weight
    }

    fn priority(&self) -> u32 {
        self.priority
    }
}

impl ModuleGenerator for OneOf {
    fn generate(&self, ctx: &mut GenContext) -> Result<GestureSet> {
        let dist = WeightedIndex::new(self.modules.iter().map(|m| m.weight()))
            .map_err(|e| GestureError::generator("OneOf", e.to_string()))?;
        let choice = dist.sample(&mut ctx.rng);
        debug!("OneOf picked module {choice} of {}", self.modules.len());
        run(&self.modules, &mut [choice], ctx)
    }

    fn weight(&self) -> f32 {
        self.weight
    }

    fn priority(&self) -> u32 {
        self.priority
    }
}

impl ModuleGenerator for SomeOf {
    fn generate(&self, ctx: &mut GenContext) -> Result<GestureSet> {
        let len = self.modules.len();
        let amount = ctx.rng.gen_range(1..=len);
        let mut picked = index::sample(&mut ctx.rng, len, amount).into_vec();
        debug!("SomeOf picked modules {picked:?}");
        run(&self.modules, &mut picked, ctx)
    }

    fn weight(&self) -> f32 {
        self.weight
    }

    fn priority(&self) -> u32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;
    use crate::declaration::{GestureDecl, TranslationEventArgs};
    use crate::generators::HIGHEST_PRIORITY;
    use crate::value::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Emits one event gesture and records call order.
    #[derive(Debug)]
    struct Fixed {
        id: &'static str,
        weight: f32,
        priority: u32,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl ModuleGenerator for Fixed {
        fn generate(&self, _ctx: &mut GenContext) -> Result<GestureSet> {
            self.log.borrow_mut().push(self.id);
            GestureSet::new().with(
                self.id,
                GestureDecl::TranslationEvent(TranslationEventArgs {
                    start_frame: 1,
                    location: Vec3::along(Axis::X, 1.0),
                    relative: true,
                }),
            )
        }

        fn weight(&self) -> f32 {
            self.weight
        }

        fn priority(&self) -> u32 {
            self.priority
        }
    }

    fn fixed(
        log: &Rc<RefCell<Vec<&'static str>>>,
        id: &'static str,
        weight: f32,
        priority: u32,
    ) -> Box<dyn ModuleGenerator> {
        Box::new(Fixed {
            id,
            weight,
            priority,
            log: Rc::clone(log),
        })
    }

    #[test]
    fn all_of_runs_in_priority_order() {
        let log = Rc::default();
        let op = AllOf::new(vec![
            fixed(&log, "late", 1.0, LOWEST_PRIORITY),
            fixed(&log, "early", 1.0, HIGHEST_PRIORITY),
            fixed(&log, "mid", 1.0, 2),
        ])
        .unwrap();
        let set = op.generate(&mut GenContext::new(0, 24)).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(*log.borrow(), vec!["early", "mid", "late"]);
    }

    #[test]
    fn one_of_respects_zero_weights() {
        let log = Rc::default();
        let op = OneOf::new(vec![
            fixed(&log, "never", 0.0, HIGHEST_PRIORITY),
            fixed(&log, "always", 1.0, HIGHEST_PRIORITY),
        ])
        .unwrap();
        for seed in 0..20 {
            let set = op.generate(&mut GenContext::new(seed, 24)).unwrap();
            assert_eq!(set.ids().collect::<Vec<_>>(), vec!["always"]);
        }
    }

    #[test]
    fn some_of_picks_a_non_empty_subset() {
        let log = Rc::default();
        let op = SomeOf::new(vec![
            fixed(&log, "a", 1.0, 0),
            fixed(&log, "b", 1.0, 1),
            fixed(&log, "c", 1.0, 2),
        ])
        .unwrap();
        for seed in 0..20 {
            let set = op.generate(&mut GenContext::new(seed, 24)).unwrap();
            assert!((1..=3).contains(&set.len()));
        }
    }

    #[test]
    fn duplicate_ids_fail_the_merge() {
        let log = Rc::default();
        let op = AllOf::new(vec![
            fixed(&log, "same", 1.0, HIGHEST_PRIORITY),
            fixed(&log, "same", 1.0, 1),
        ])
        .unwrap();
        assert!(matches!(
            op.generate(&mut GenContext::new(0, 24)),
            Err(GestureError::DuplicateGesture(id)) if id == "same"
        ));
    }

    #[test]
    fn rejects_empty_and_negative_weights() {
        assert!(AllOf::new(Vec::new()).is_err());
        let log = Rc::default();
        assert!(OneOf::new(vec![fixed(&log, "neg", -1.0, 0)]).is_err());
        assert!(SomeOf::with_weight(vec![fixed(&log, "ok", 1.0, 0)], -0.5, 0).is_err());
    }
}
