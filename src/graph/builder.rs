//! Routing universe assembly.

use std::collections::HashMap;

use crate::error::ScheduleError;
use crate::models::{Node, TimeWindow};
use crate::travel::{SpeedModel, TravelTimeMatrix};

use super::{AppointmentRecord, ClientRecord, StartRecord, TravelTable};

/// The assembled routing universe.
///
/// Nodes are ordered `[Starts…, Clients…, ApptDuplicates…]`, node 0 is
/// the base, and every per-node attribute array is indexed by primary
/// node. The travel-time matrix is over the distinct cities of the
/// universe; `travel_time` resolves nodes through their primary's city.
#[derive(Debug)]
pub struct RoutingUniverse {
    nodes: Vec<Node>,
    n_starts: usize,
    n_clients: usize,
    priority: Vec<i64>,
    service_time: Vec<i64>,
    city: Vec<usize>,
    cities: Vec<String>,
    matrix: TravelTimeMatrix,
    time_windows: Vec<TimeWindow>,
    duplicate_of: Vec<Option<usize>>,
    paths: HashMap<(String, String), Vec<String>>,
}

impl RoutingUniverse {
    /// All nodes, in universe order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// One node by index.
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Total node count (starts + clients + duplicates).
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of start locations; node 0 is the base.
    pub fn n_starts(&self) -> usize {
        self.n_starts
    }

    /// Number of eligible clients.
    pub fn n_clients(&self) -> usize {
        self.n_clients
    }

    /// Number of appointment duplicates.
    pub fn n_appts(&self) -> usize {
        self.time_windows.len()
    }

    /// Number of primary nodes (starts + clients).
    pub fn n_primary(&self) -> usize {
        self.n_starts + self.n_clients
    }

    /// The canonical node a (possibly duplicated) node resolves to.
    pub fn primary(&self, node: usize) -> usize {
        self.nodes[node].primary()
    }

    /// The node's label.
    pub fn label(&self, node: usize) -> &str {
        self.nodes[node].label()
    }

    /// Priority of the node's primary (0 for starts).
    pub fn priority_of(&self, node: usize) -> i64 {
        self.priority[self.primary(node)]
    }

    /// Service time of the node's primary, quarter-hour units.
    pub fn service_time_of(&self, node: usize) -> i64 {
        self.service_time[self.primary(node)]
    }

    /// City name of the node's primary.
    pub fn city_of(&self, node: usize) -> &str {
        &self.cities[self.city[self.primary(node)]]
    }

    /// Travel time between two nodes' cities, quarter-hour units.
    pub fn travel_time(&self, from: usize, to: usize) -> i64 {
        self.matrix
            .get(self.city[self.primary(from)], self.city[self.primary(to)])
    }

    /// Travel time from the base to the node's city.
    pub fn time_from_base(&self, node: usize) -> i64 {
        self.travel_time(0, node)
    }

    /// All appointment time windows, in duplicate order.
    pub fn time_windows(&self) -> &[TimeWindow] {
        &self.time_windows
    }

    /// The time window carried by `node`, when it is a duplicate.
    pub fn appointment_for(&self, node: usize) -> Option<&TimeWindow> {
        let first_dup = self.n_primary();
        if node >= first_dup {
            self.time_windows.get(node - first_dup)
        } else {
            None
        }
    }

    /// The duplicate of a primary client node, if it has an appointment.
    pub fn duplicate_of(&self, client: usize) -> Option<usize> {
        self.duplicate_of.get(client).copied().flatten()
    }

    /// The raw travel-time matrix over the universe's distinct cities.
    pub fn matrix(&self) -> &TravelTimeMatrix {
        &self.matrix
    }

    /// The distinct cities, in matrix row order.
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// The rendering path between two cities.
    pub fn path(&self, from: &str, to: &str) -> Option<&[String]> {
        self.paths
            .get(&(from.to_string(), to.to_string()))
            .map(|p| p.as_slice())
    }
}

/// Builds a [`RoutingUniverse`] from ingested records.
///
/// # Examples
///
/// ```
/// use weekplan::graph::{ClientRecord, StartRecord, TravelTable, UniverseBuilder};
///
/// let travel = TravelTable::from_coordinates(vec![
///     ("Athens".to_string(), (37.98, 23.73)),
///     ("Patras".to_string(), (38.25, 21.73)),
/// ]);
/// let universe = UniverseBuilder::new(
///     vec![StartRecord::new("Base", "Athens")],
///     vec![ClientRecord::new("Acme", "Patras", 7, 2)],
///     vec![],
///     travel,
/// )
/// .build()
/// .unwrap();
/// assert_eq!(universe.num_nodes(), 2);
/// ```
pub struct UniverseBuilder {
    starts: Vec<StartRecord>,
    clients: Vec<ClientRecord>,
    appointments: Vec<AppointmentRecord>,
    travel: TravelTable,
    speed: SpeedModel,
    priority_cutoff: i64,
}

impl UniverseBuilder {
    /// Creates a builder over the ingested records.
    pub fn new(
        starts: Vec<StartRecord>,
        clients: Vec<ClientRecord>,
        appointments: Vec<AppointmentRecord>,
        travel: TravelTable,
    ) -> Self {
        Self {
            starts,
            clients,
            appointments,
            travel,
            speed: SpeedModel::default(),
            priority_cutoff: 0,
        }
    }

    /// Replaces the distance-to-time model.
    pub fn with_speed_model(mut self, speed: SpeedModel) -> Self {
        self.speed = speed;
        self
    }

    /// Keeps only clients with priority strictly above the cutoff.
    pub fn with_priority_cutoff(mut self, cutoff: i64) -> Self {
        self.priority_cutoff = cutoff;
        self
    }

    /// Assembles the universe.
    ///
    /// Fatal conditions: an empty start list (node 0 must be the base)
    /// and a missing distance or path entry for any required city pair.
    pub fn build(self) -> Result<RoutingUniverse, ScheduleError> {
        if self.starts.is_empty() {
            return Err(ScheduleError::NoBase);
        }

        let cutoff = self.priority_cutoff;
        let eligible: Vec<ClientRecord> = self
            .clients
            .into_iter()
            .filter(|c| c.priority > cutoff)
            .collect();

        let n_starts = self.starts.len();
        let n_clients = eligible.len();
        let n_primary = n_starts + n_clients;

        let mut nodes = Vec::with_capacity(n_primary);
        for (i, s) in self.starts.iter().enumerate() {
            nodes.push(Node::start(i, s.label.clone()));
        }
        for (j, c) in eligible.iter().enumerate() {
            nodes.push(Node::client(n_starts + j, c.label.clone()));
        }

        // Appointments for unknown or filtered-out clients carry no node.
        let mut by_client: HashMap<&str, &AppointmentRecord> = HashMap::new();
        for rec in &self.appointments {
            by_client.entry(rec.client.as_str()).or_insert(rec);
        }
        let eligible_labels: Vec<&str> = eligible.iter().map(|c| c.label.as_str()).collect();
        for rec in &self.appointments {
            if !eligible_labels.contains(&rec.client.as_str()) {
                tracing::debug!(client = %rec.client, "ignoring appointment for non-eligible client");
            }
        }

        let mut time_windows = Vec::new();
        let mut duplicate_of = vec![None; n_primary];
        for (j, c) in eligible.iter().enumerate() {
            if let Some(rec) = by_client.get(c.label.as_str()) {
                let dup = n_primary + time_windows.len();
                nodes.push(Node::appt_duplicate(dup, c.label.clone(), n_starts + j));
                time_windows.push(TimeWindow::at(rec.time, rec.day, dup));
                duplicate_of[n_starts + j] = Some(dup);
            }
        }

        let mut priority = Vec::with_capacity(n_primary);
        let mut service_time = Vec::with_capacity(n_primary);
        let mut city_names = Vec::with_capacity(n_primary);
        for s in &self.starts {
            priority.push(0);
            service_time.push(0);
            city_names.push(s.city.clone());
        }
        for c in &eligible {
            priority.push(c.priority);
            service_time.push(c.service_time);
            city_names.push(c.city.clone());
        }

        let mut cities: Vec<String> = Vec::new();
        let mut city = Vec::with_capacity(n_primary);
        for name in &city_names {
            let idx = match cities.iter().position(|c| c == name) {
                Some(idx) => idx,
                None => {
                    cities.push(name.clone());
                    cities.len() - 1
                }
            };
            city.push(idx);
        }

        let mut matrix = TravelTimeMatrix::new(cities.len());
        for (i, from) in cities.iter().enumerate() {
            for (j, to) in cities.iter().enumerate() {
                let miles = if i == j {
                    self.travel.distance(from, to).unwrap_or(0.0)
                } else {
                    self.travel.distance(from, to).ok_or_else(|| {
                        ScheduleError::MissingTravelEntry {
                            from: from.clone(),
                            to: to.clone(),
                        }
                    })?
                };
                matrix.set(i, j, self.speed.travel_time(miles));
            }
        }

        // Hub shortcut overrides, both directions, already in time units.
        let base_city = city[0];
        for (s, rec) in self.starts.iter().enumerate().skip(1) {
            if let Some(to_base) = rec.to_base {
                matrix.set(city[s], base_city, to_base);
            }
            if let Some(from_base) = rec.from_base {
                matrix.set(base_city, city[s], from_base);
            }
        }

        let mut paths = HashMap::new();
        for from in &cities {
            for to in &cities {
                if from == to {
                    continue;
                }
                let p = self
                    .travel
                    .path(from, to)
                    .ok_or_else(|| ScheduleError::MissingPathEntry {
                        from: from.clone(),
                        to: to.clone(),
                    })?
                    .to_vec();
                paths.insert((from.clone(), to.clone()), p);
            }
        }
        let base_city_name = cities[base_city].clone();
        for (s, rec) in self.starts.iter().enumerate().skip(1) {
            if rec.air_reachable && city[s] != base_city {
                let hub_city = cities[city[s]].clone();
                paths.insert(
                    (base_city_name.clone(), hub_city.clone()),
                    vec![base_city_name.clone(), hub_city.clone()],
                );
                paths.insert(
                    (hub_city.clone(), base_city_name.clone()),
                    vec![hub_city, base_city_name.clone()],
                );
            }
        }

        Ok(RoutingUniverse {
            nodes,
            n_starts,
            n_clients,
            priority,
            service_time,
            city,
            cities,
            matrix,
            time_windows,
            duplicate_of,
            paths,
        })
    }
}
