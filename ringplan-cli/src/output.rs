use ringplan_core::render::Renderer;
use ringplan_core::{Capacity, Group, Mode, Place, Plan, Slot};

/// Renders [`Plan`]s as plain text tables.
#[derive(Clone, Debug, Default)]
pub struct TableRenderer {
    lines: Vec<String>,
}

impl TableRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(&mut self, capacity: &Capacity) {
        self.lines.push(format!(
            "Window:        {} - {}",
            ringplan_core::capacity::format_minutes(capacity.start),
            ringplan_core::capacity::format_minutes(capacity.end)
        ));
        self.lines
            .push(format!("Total minutes: {}", capacity.total_minutes));
        self.lines.push(format!(
            "Capacity:      {} matches on {} rings",
            capacity.capacity_matches, capacity.rings
        ));
        self.lines
            .push(format!("Ring slots:    {}", capacity.ring_slots()));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn groups(&mut self, groups: &[Group]) {
        self.lines.push(String::from("Groups:"));

        for group in groups {
            let competitors: Vec<_> = group.competitors.iter().map(|id| id.to_string()).collect();

            let first = Slot::Placement {
                place: Place::First,
                group: group.index,
            };
            let second = Slot::Placement {
                place: Place::Second,
                group: group.index,
            };

            self.lines.push(format!(
                "  Group {}: {} ({}, {})",
                group.label(),
                competitors.join(", "),
                first,
                second
            ));
        }
    }

    pub fn finish(self) -> String {
        let mut buf = self.lines.join("\n");
        buf.push('\n');
        buf
    }
}

impl Renderer for TableRenderer {
    fn render(&mut self, plan: &Plan) {
        let title = match plan.mode {
            Mode::Bracket => "Bracket plan",
            Mode::Group => "Group plan",
        };

        self.lines.push(format!(
            "{}: {} matches ({} generated), {}% utilization{}",
            title,
            plan.len(),
            plan.raw_match_count,
            plan.utilization_percent,
            if plan.overloaded { ", OVERLOADED" } else { "" }
        ));

        if let Some(size) = plan.group_size {
            self.lines.push(format!("Group size: {}", size));
        }

        for warning in &plan.warnings {
            self.lines.push(format!("Warning: {}", warning));
        }

        self.blank();
        self.lines.push(format!(
            "{:<15}  {:<4}  {:<8}  {:<12}  {:<6}  Pairing",
            "Time", "Ring", "Phase", "Round", "Match"
        ));

        for m in &plan.matches {
            self.lines.push(format!(
                "{:<15}  {:<4}  {:<8}  {:<12}  {:<6}  {} vs {}",
                m.time_range(),
                m.ring,
                m.phase.to_string(),
                m.round_name,
                m.id,
                m.slots[0],
                m.slots[1]
            ));
        }

        let load: Vec<_> = plan
            .ring_load()
            .into_iter()
            .enumerate()
            .map(|(index, count)| format!("{}: {}", index + 1, count))
            .collect();
        self.blank();
        self.lines.push(format!(
            "Ring load: {} (max {})",
            load.join(", "),
            plan.max_ring_load()
        ));

        if !plan.groups.is_empty() {
            self.blank();
            self.groups(&plan.groups);
        }

        if !plan.rounds.is_empty() {
            self.blank();
            self.lines.push(String::from("Rounds:"));

            for round in &plan.rounds {
                self.lines.push(format!("  {}", round.title));

                for seed in &round.seeds {
                    self.lines.push(format!(
                        "    {:<5}  ring {}  {:<15}  {} vs {}",
                        seed.id,
                        seed.ring,
                        seed.time.as_deref().unwrap_or("-"),
                        seed.teams[0].name,
                        seed.teams[1].name
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ringplan_core::render::Renderer;
    use ringplan_core::{Generator, Options};

    use super::TableRenderer;

    #[test]
    fn test_render_bracket_plan() {
        let options = Options::builder().competitors(4).rings(2).build();
        let plan = Generator::new(options).unwrap().bracket().unwrap();

        let mut renderer = TableRenderer::new();
        renderer.render(&plan);
        let output = renderer.finish();

        assert!(output.starts_with("Bracket plan: 3 matches (3 generated), 5% utilization\n"));
        assert!(output.contains("Competitor 1 vs Competitor 2"));
        assert!(output.contains("Winner of Semifinal 1 vs Winner of Semifinal 2"));
        assert!(output.contains("Ring load: 1: 2, 2: 1 (max 2)"));
        assert!(output.contains("    2-1    ring 1  09:04 – 09:08"));
    }

    #[test]
    fn test_render_group_plan() {
        let options = Options::builder().competitors(8).rings(2).build();
        let plan = Generator::new(options).unwrap().groups().unwrap();

        let mut renderer = TableRenderer::new();
        renderer.render(&plan);
        let output = renderer.finish();

        assert!(output.starts_with("Group plan:"));
        assert!(output.contains("  Group A: 1, 2, 3, 4 (1st A, 2nd A)"));
        assert!(output.contains("  Group B: 5, 6, 7, 8 (1st B, 2nd B)"));
        assert!(output.contains("1st A vs 2nd B"));
    }
}
