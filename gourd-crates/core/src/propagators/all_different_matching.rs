use std::collections::VecDeque;

use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagatorConflict;
use crate::containers::HashSet;
use crate::create_statistics_struct;
use crate::engine::events::DomainEvents;
use crate::engine::predicates::Predicate;
use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::IntVarId;
use crate::predicate;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::ManipulateTrailedValues;
use crate::propagation::MutateDomains;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

const UNMATCHED: i64 = -1;

/// The [`PropagatorConstructor`] for the [`AllDifferentMatchingPropagator`].
#[derive(Clone, Debug)]
pub struct AllDifferentMatching {
    pub variables: Box<[IntVarId]>,
}

impl PropagatorConstructor for AllDifferentMatching {
    type PropagatorImpl = AllDifferentMatchingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for (index, &variable) in self.variables.iter().enumerate() {
            context.register(variable, DomainEvents::ANY_INT, LocalId::from(index as u32));
        }

        let offset = self
            .variables
            .iter()
            .map(|&variable| context.lower_bound(variable))
            .min()
            .unwrap_or_default();
        let num_values = self
            .variables
            .iter()
            .map(|&variable| (context.upper_bound(variable) - offset + 1) as usize)
            .max()
            .unwrap_or_default();

        let matched_value = self
            .variables
            .iter()
            .map(|_| context.new_trailed_integer(UNMATCHED))
            .collect();
        let matched_variable = (0..num_values)
            .map(|_| context.new_trailed_integer(UNMATCHED))
            .collect();

        AllDifferentMatchingPropagator {
            variables: self.variables,
            offset,
            matched_value,
            matched_variable,
            statistics: AllDifferentMatchingStatistics::default(),
        }
    }
}

create_statistics_struct!(AllDifferentMatchingStatistics {
    num_augmenting_paths: usize,
    num_values_removed: usize,
});

/// Domain consistent filtering for the constraint that all variables take pairwise different
/// values.
///
/// The propagator keeps a maximum matching between the variables and the values in trailed
/// integers. A call repairs the matching: variables whose matched value left their domain are
/// unmatched and then matched again along augmenting paths. When some variable cannot be matched,
/// the variables visited by the failed search form a Hall set and are reported as the conflict.
/// Otherwise every value which is not matched to a variable and lies in a different strongly
/// connected component of the residual graph than that variable is removed.
///
/// Since the matching is trailed, backtracking restores the matching which was computed for the
/// restored domains, and the repair only has to look at the variables that lost their value.
#[derive(Clone, Debug)]
pub struct AllDifferentMatchingPropagator {
    variables: Box<[IntVarId]>,
    /// The smallest value in any initial domain; value `v` is stored at index `v - offset`.
    offset: i32,
    /// Per variable, the index of its matched value or [`UNMATCHED`].
    matched_value: Box<[TrailedInteger]>,
    /// Per value index, the variable it is matched to or [`UNMATCHED`].
    matched_variable: Box<[TrailedInteger]>,
    statistics: AllDifferentMatchingStatistics,
}

impl AllDifferentMatchingPropagator {
    /// The value matched to the variable at `index`.
    pub fn matched_value(&self, domains: &impl ReadDomains, index: usize) -> Option<i32> {
        let value_index = domains.read(self.matched_value[index]);
        (value_index != UNMATCHED).then(|| self.offset + value_index as i32)
    }

    fn matched_variable(&self, domains: &impl ReadDomains, value: i32) -> Option<usize> {
        let variable = domains.read(self.matched_variable[self.value_index(value)]);
        (variable != UNMATCHED).then_some(variable as usize)
    }

    fn value_index(&self, value: i32) -> usize {
        (value - self.offset) as usize
    }

    fn num_values(&self) -> usize {
        self.matched_variable.len()
    }

    fn set_match(&self, context: &mut PropagationContext, index: usize, value: i32) {
        let value_index = self.value_index(value);
        context.assign(self.matched_value[index], value_index as i64);
        context.assign(self.matched_variable[value_index], index as i64);
    }

    fn unmatch(&self, context: &mut PropagationContext, index: usize) {
        if let Some(value) = self.matched_value(&*context, index) {
            context.assign(self.matched_value[index], UNMATCHED);
            context.assign(self.matched_variable[self.value_index(value)], UNMATCHED);
        }
    }

    /// Search an alternating path from the unmatched variable at `root` to a free value and flip
    /// it. On failure, returns the variables which were reached.
    fn augment(&mut self, context: &mut PropagationContext, root: usize) -> Result<(), Vec<usize>> {
        let mut reached_from: Vec<Option<usize>> = vec![None; self.num_values()];
        let mut visited = vec![root];
        let mut is_visited = vec![false; self.variables.len()];
        is_visited[root] = true;
        let mut queue = VecDeque::from([root]);

        while let Some(index) = queue.pop_front() {
            let values = context
                .iterate_values(self.variables[index])
                .collect::<Vec<_>>();
            for value in values {
                let value_index = self.value_index(value);
                if reached_from[value_index].is_some() {
                    continue;
                }
                reached_from[value_index] = Some(index);

                match self.matched_variable(&*context, value) {
                    Some(next) => {
                        if !is_visited[next] {
                            is_visited[next] = true;
                            visited.push(next);
                            queue.push_back(next);
                        }
                    }
                    None => {
                        self.statistics.num_augmenting_paths += 1;
                        let mut value = value;
                        while let Some(index) = reached_from[self.value_index(value)] {
                            let previous = self.matched_value(&*context, index);
                            self.set_match(context, index, value);
                            match previous {
                                Some(previous) => value = previous,
                                None => break,
                            }
                        }
                        return Ok(());
                    }
                }
            }
        }

        Err(visited)
    }

    /// The bounds and holes of the variables which form a Hall set.
    fn explain_hall_set(&self, domains: &impl ReadDomains, indices: &[usize]) -> Vec<Predicate> {
        let mut conjunction = vec![];
        for &index in indices {
            let variable = self.variables[index];
            let lower_bound = domains.lower_bound(variable);
            let upper_bound = domains.upper_bound(variable);
            conjunction.push(predicate!(variable >= lower_bound));
            conjunction.push(predicate!(variable <= upper_bound));
            conjunction.extend(
                (lower_bound..upper_bound)
                    .filter(|&value| !domains.contains(variable, value))
                    .map(|value| predicate!(variable != value)),
            );
        }
        conjunction
    }

    /// The residual graph of the matching. Nodes are the variables, then the values, then a sink.
    /// A variable points to its matched value, a value to the other variables which contain it,
    /// a matched value to the sink and the sink to every free value.
    fn residual_graph(&self, domains: &impl ReadDomains) -> Vec<Vec<usize>> {
        let num_variables = self.variables.len();
        let sink = num_variables + self.num_values();
        let mut graph = vec![vec![]; sink + 1];

        for (index, &variable) in self.variables.iter().enumerate() {
            let matched = self.matched_value(domains, index);
            for value in domains.iterate_values(variable) {
                let value_node = num_variables + self.value_index(value);
                if Some(value) == matched {
                    graph[index].push(value_node);
                } else {
                    graph[value_node].push(index);
                }
            }
        }

        for value_index in 0..self.num_values() {
            let value_node = num_variables + value_index;
            if domains.read(self.matched_variable[value_index]) == UNMATCHED {
                graph[sink].push(value_node);
            } else {
                graph[value_node].push(sink);
            }
        }

        graph
    }

    fn remove_unsupported_values(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let num_variables = self.variables.len();
        let graph = self.residual_graph(&*context);
        let component = StronglyConnectedComponents::of(&graph);

        for (index, &variable) in self.variables.iter().enumerate() {
            let matched = self.matched_value(&*context, index);
            let unsupported = context
                .iterate_values(variable)
                .filter(|&value| {
                    Some(value) != matched
                        && component[index] != component[num_variables + self.value_index(value)]
                })
                .collect::<Vec<_>>();
            if unsupported.is_empty() {
                continue;
            }

            for &value in &unsupported {
                if context.remove_value(variable, value)? {
                    self.statistics.num_values_removed += 1;
                }
            }
            // A bounded domain ignores interior removals, values which became its upper bound
            // are removed from the top.
            if !context.is_enumerated(variable) {
                for &value in unsupported.iter().rev() {
                    if context.remove_value(variable, value)? {
                        self.statistics.num_values_removed += 1;
                    }
                }
            }
        }

        Ok(())
    }
}

impl Propagator for AllDifferentMatchingPropagator {
    fn name(&self) -> &str {
        "AllDifferentMatching"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        for index in 0..self.variables.len() {
            if let Some(value) = self.matched_value(&context, index) {
                if !context.contains(self.variables[index], value) {
                    self.unmatch(&mut context, index);
                }
            }
        }

        for index in 0..self.variables.len() {
            if self.matched_value(&context, index).is_some() {
                continue;
            }
            if let Err(hall_set) = self.augment(&mut context, index) {
                return Err(PropagatorConflict {
                    conjunction: self.explain_hall_set(&context, &hall_set),
                }
                .into());
            }
        }

        self.remove_unsupported_values(&mut context)
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let mut fixed_values: HashSet<i32> = HashSet::default();
        let mut all_fixed = true;
        for &variable in self.variables.iter() {
            match domains.fixed_value(variable) {
                Some(value) => {
                    if !fixed_values.insert(value) {
                        return Entailment::False;
                    }
                }
                None => all_fixed = false,
            }
        }

        if all_fixed {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

/// Tarjan's algorithm; `component[node]` identifies the component of every node.
struct StronglyConnectedComponents<'graph> {
    graph: &'graph [Vec<usize>],
    dfs_number: Vec<Option<usize>>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_number: usize,
    component: Vec<usize>,
    num_components: usize,
}

impl<'graph> StronglyConnectedComponents<'graph> {
    fn of(graph: &'graph [Vec<usize>]) -> Vec<usize> {
        let num_nodes = graph.len();
        let mut search = StronglyConnectedComponents {
            graph,
            dfs_number: vec![None; num_nodes],
            low_link: vec![0; num_nodes],
            on_stack: vec![false; num_nodes],
            stack: vec![],
            next_number: 0,
            component: vec![0; num_nodes],
            num_components: 0,
        };

        for node in 0..num_nodes {
            if search.dfs_number[node].is_none() {
                search.visit(node);
            }
        }

        search.component
    }

    fn visit(&mut self, node: usize) {
        self.dfs_number[node] = Some(self.next_number);
        self.low_link[node] = self.next_number;
        self.next_number += 1;
        self.stack.push(node);
        self.on_stack[node] = true;

        let graph = self.graph;
        for &neighbour in &graph[node] {
            match self.dfs_number[neighbour] {
                None => {
                    self.visit(neighbour);
                    self.low_link[node] = self.low_link[node].min(self.low_link[neighbour]);
                }
                Some(number) if self.on_stack[neighbour] => {
                    self.low_link[node] = self.low_link[node].min(number);
                }
                Some(_) => {}
            }
        }

        if Some(self.low_link[node]) == self.dfs_number[node] {
            while let Some(top) = self.stack.pop() {
                self.on_stack[top] = false;
                self.component[top] = self.num_components;
                if top == node {
                    break;
                }
            }
            self.num_components += 1;
        }
    }
}
