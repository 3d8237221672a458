//! Fluent builder for constructing a [`Planner`].

use rustc_hash::FxHashSet;

use fleet_alloc::{Allocator, AssignmentStore};
use fleet_core::VehicleId;
use fleet_schedule::RouteScheduleTemplate;

use crate::planner::{PlanOptions, Planner};
use crate::policy::DispatchPolicy;
use crate::{PlanError, PlanResult};

/// Fluent builder for [`Planner<S, P>`].
///
/// # Required inputs
///
/// - `S: AssignmentStore` — where committed assignments live
///   (e.g. [`fleet_alloc::MemoryStore`])
/// - `P: DispatchPolicy` — the vehicle-preference policy
///   (e.g. [`InInputOrder`][crate::InInputOrder])
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                 |
/// |-----------------|-------------------------|
/// | `.templates(v)` | No templates            |
/// | `.fleet(v)`     | Empty fleet             |
/// | `.options(o)`   | [`PlanOptions::default`]|
///
/// # Example
///
/// ```rust,ignore
/// let planner = PlannerBuilder::new(MemoryStore::new(), LeastRecentlyUsed)
///     .templates(templates)
///     .fleet(vec![VehicleId(1), VehicleId(2)])
///     .build()?;
/// let report = planner.plan(monday, sunday)?;
/// ```
pub struct PlannerBuilder<S: AssignmentStore, P: DispatchPolicy> {
    store:     S,
    policy:    P,
    templates: Vec<RouteScheduleTemplate>,
    fleet:     Vec<VehicleId>,
    options:   PlanOptions,
}

impl<S: AssignmentStore, P: DispatchPolicy> PlannerBuilder<S, P> {
    /// Create a builder with all required inputs.
    pub fn new(store: S, policy: P) -> Self {
        Self {
            store,
            policy,
            templates: Vec::new(),
            fleet:     Vec::new(),
            options:   PlanOptions::default(),
        }
    }

    /// Supply the route-schedule templates to materialize.
    pub fn templates(mut self, templates: Vec<RouteScheduleTemplate>) -> Self {
        self.templates = templates;
        self
    }

    /// Supply the fleet.  Order is kept and treated as the caller's standing
    /// preference ranking (what [`InInputOrder`][crate::InInputOrder] uses).
    pub fn fleet(mut self, fleet: Vec<VehicleId>) -> Self {
        self.fleet = fleet;
        self
    }

    /// Override the default [`PlanOptions`].
    pub fn options(mut self, options: PlanOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate inputs and return a ready-to-run [`Planner`].
    ///
    /// An empty fleet or template list is allowed (the plan run simply does
    /// less); duplicate template or vehicle ids are not.
    pub fn build(self) -> PlanResult<Planner<S, P>> {
        let mut seen_templates = FxHashSet::default();
        for t in &self.templates {
            if !seen_templates.insert(t.id()) {
                return Err(PlanError::DuplicateTemplate(t.id()));
            }
        }

        let mut seen_vehicles = FxHashSet::default();
        for &v in &self.fleet {
            if !seen_vehicles.insert(v) {
                return Err(PlanError::DuplicateVehicle(v));
            }
        }

        Ok(Planner {
            allocator: Allocator::new(self.store)
                .with_commit_retries(self.options.commit_retries),
            policy:    self.policy,
            templates: self.templates,
            fleet:     self.fleet,
            options:   self.options,
        })
    }
}
