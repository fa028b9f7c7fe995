use std::{
    cell::{Ref, RefCell},
    time::Duration,
};

use futures::future::join_all;
use serde_json::Value;

use crate::{
    animation::{clock::Pacing, ease::parse_ease, transition::Transition},
    command::{
        error::CommandError,
        model::{self, Command, CommandTag},
    },
    foundation::{
        color::Rgba8,
        core::{ENTER_TRANSITION_MS, EXIT_TRANSITION_MS, EntityId, Point},
    },
    render::{
        backend::RenderBackend,
        build::{self, Highlight, Intensity},
        primitive::Primitive,
        projector::Renderer,
    },
    scene::{
        model::{
            Annotation, ArrayEntity, Edge, EntityKind, Label, LabelTone, LineStyle, Node, Pointer,
        },
        store::{Entity, SceneStore},
    },
};

const EDGE_DRAW_MS: u64 = 500;
const COMPARE_RESULT_DELAY_MS: u64 = 500;
const COMPARE_RESULT_HOLD_MS: u64 = 800;
const COMPARE_TOTAL_MS: u64 = 1500;
const PULSE_MS: u64 = 400;
const PATH_STAGGER_MS: u64 = 300;
const PATH_HOLD_MS: u64 = 800;
const CELL_HIGHLIGHT_MS: u64 = 1000;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// A command that was skipped, with its position in the step.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedCommand {
    /// Index in the step's command list.
    pub index: usize,
    /// Why it was skipped.
    pub error: CommandError,
}

/// Outcome of executing one step's commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Commands that took effect.
    pub applied: usize,
    /// Commands that were logged and skipped.
    pub skipped: Vec<SkippedCommand>,
}

impl StepReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: StepReport) {
        self.applied += other.applied;
        self.skipped.extend(other.skipped);
    }
}

struct SceneState {
    store: SceneStore,
    renderer: Renderer,
}

impl SceneState {
    fn node_primitive(&self, id: &str, highlight: Option<Highlight>) -> Option<Primitive> {
        self.store
            .get::<Node>(id)
            .map(|node| build::node(node, highlight))
    }

    fn edge_primitive(&self, edge: &Edge) -> Option<Primitive> {
        let from = self.store.get::<Node>(edge.from.as_str())?.position;
        let to = self.store.get::<Node>(edge.to.as_str())?.position;
        Some(build::edge(edge, from, to))
    }

    fn array_primitive(&self, id: &str, tinted: &[(usize, Rgba8)]) -> Option<Primitive> {
        self.store
            .get::<ArrayEntity>(id)
            .map(|arr| build::array(arr, tinted))
    }

    /// Redraw a node from the store, with an optional highlight.
    fn redraw_node(&mut self, id: &EntityId, highlight: Option<Highlight>) -> bool {
        match self.node_primitive(id.as_str(), highlight) {
            Some(p) => self.renderer.refresh(id, p, Transition::cut()),
            None => false,
        }
    }

    fn redraw_array(&mut self, id: &EntityId, tinted: &[(usize, Rgba8)]) -> bool {
        match self.array_primitive(id.as_str(), tinted) {
            Some(p) => self.renderer.refresh(id, p, Transition::cut()),
            None => false,
        }
    }

    /// Redraw every edge attached to `node` so it follows the node's current position.
    fn redraw_edges_of(&mut self, node: &str) {
        for edge_id in self.store.edges_touching(node) {
            let Some(edge) = self.store.get::<Edge>(edge_id.as_str()) else {
                continue;
            };
            if let Some(p) = self.edge_primitive(edge) {
                self.renderer.refresh(&edge_id, p, Transition::cut());
            }
        }
    }

    /// Redraw every pointer into `array` against its current geometry.
    fn redraw_pointers_of(&mut self, array: &str) {
        let Some(arr) = self.store.get::<ArrayEntity>(array) else {
            return;
        };
        let redraws: Vec<(EntityId, Primitive)> = self
            .store
            .iter::<Pointer>()
            .filter(|p| p.array.as_str() == array && arr.contains(p.index))
            .map(|p| (p.id.clone(), build::pointer(p, arr)))
            .collect();
        for (id, p) in redraws {
            self.renderer.refresh(&id, p, Transition::cut());
        }
    }
}

/// Applies step commands to the scene store and renderer.
///
/// Every command of a step starts at once and the step settles when the slowest animation has
/// completed. Failures are per command: logged, reported, skipped.
pub struct Interpreter {
    scene: RefCell<SceneState>,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter").finish_non_exhaustive()
    }
}

impl Interpreter {
    /// Interpreter drawing onto `backend`, starting from an empty scene.
    pub fn new(backend: impl RenderBackend + 'static) -> Self {
        Self {
            scene: RefCell::new(SceneState {
                store: SceneStore::new(),
                renderer: Renderer::new(backend),
            }),
        }
    }

    /// Read access to the scene store.
    ///
    /// Do not hold the guard across an await.
    pub fn store(&self) -> Ref<'_, SceneStore> {
        Ref::map(self.scene.borrow(), |s| &s.store)
    }

    /// Read access to the renderer's live index.
    pub fn renderer(&self) -> Ref<'_, Renderer> {
        Ref::map(self.scene.borrow(), |s| &s.renderer)
    }

    /// Clear the store and every drawn primitive.
    pub fn reset(&self) {
        let mut scene = self.scene.borrow_mut();
        scene.store.reset();
        scene.renderer.reset();
    }

    /// Decode and run a step's raw commands concurrently.
    #[tracing::instrument(level = "debug", skip_all, fields(commands = commands.len(), pacing = ?pacing))]
    pub async fn execute(&self, commands: &[Value], pacing: Pacing) -> StepReport {
        let runs = commands.iter().enumerate().map(|(index, raw)| async move {
            let outcome = match Command::decode(raw) {
                Ok(cmd) => self.apply(cmd, pacing).await,
                Err(e) => Err(e),
            };
            (index, outcome)
        });

        let mut report = StepReport::default();
        for (index, outcome) in join_all(runs).await {
            match outcome {
                Ok(()) => report.applied += 1,
                Err(error) => {
                    tracing::warn!(index, %error, "skipping command");
                    report.skipped.push(SkippedCommand { index, error });
                }
            }
        }
        report
    }

    /// Run one typed command to completion.
    pub async fn apply(&self, cmd: Command, pacing: Pacing) -> Result<(), CommandError> {
        let tag = cmd.tag();
        tracing::debug!(%tag, "dispatch");
        match cmd {
            Command::CreateNode(p) => self.create_node(p, pacing).await,
            Command::UpdateNode(p) => self.update_node(p),
            Command::DeleteNode(p) => self.delete::<Node>(tag, &p.id, pacing).await,
            Command::MoveNode(p) => self.move_node(p, pacing).await,
            Command::Highlight(p) => {
                let h = Highlight {
                    color: Rgba8::parse_or(p.color.as_deref(), Rgba8::CYAN),
                    intensity: Intensity::from_name(p.intensity.as_deref()),
                };
                self.require_nodes(tag, std::slice::from_ref(&p.id))?;
                self.flash_node(&p.id, h, p.duration.as_duration(), pacing)
                    .await;
                Ok(())
            }
            Command::Compare(p) => self.compare(p, pacing).await,
            Command::Pulse(p) => {
                self.require_nodes(tag, std::slice::from_ref(&p.id))?;
                let h = Highlight {
                    color: Rgba8::parse_or(p.color.as_deref(), Rgba8::CYAN),
                    intensity: Intensity::High,
                };
                for _ in 0..p.count {
                    self.flash_node(&p.id, h, ms(PULSE_MS), pacing).await;
                }
                Ok(())
            }
            Command::CreateEdge(p) => self.create_edge(p, pacing).await,
            Command::DeleteEdge(p) => self.delete::<Edge>(tag, &p.id, pacing).await,
            Command::HighlightPath(p) => self.highlight_path(p, pacing).await,
            Command::CreateArray(p) => self.create_array(p, pacing).await,
            Command::Swap(p) => self.swap(p, pacing).await,
            Command::UpdateCell(p) => self.update_cell(p, pacing).await,
            Command::SetPointer(p) => self.set_pointer(p, pacing).await,
            Command::AddLabel(p) => {
                let label = Label {
                    id: p.id,
                    text: p.text.0,
                    position: p.position.into(),
                    tone: LabelTone::from_name(p.style.as_deref()),
                };
                let primitive = build::label(&label);
                self.create(tag, label, primitive, pacing).await
            }
            Command::AddAnnotation(p) => {
                if !p.kind.trim().eq_ignore_ascii_case("arrow") {
                    return Err(CommandError::rejected(
                        tag,
                        format!("unsupported annotation type '{}'", p.kind),
                    ));
                }
                let annotation = Annotation {
                    id: p.id,
                    from: p.from.into(),
                    to: p.to.into(),
                    text: p.label.map(|l| l.0),
                };
                let primitive = build::annotation(&annotation);
                self.create(tag, annotation, primitive, pacing).await
            }
        }
    }

    /// Insert `entity`, show its primitive and wait for the enter transition.
    async fn create<T: Entity>(
        &self,
        tag: CommandTag,
        entity: T,
        primitive: Primitive,
        pacing: Pacing,
    ) -> Result<(), CommandError> {
        self.create_with(tag, entity, primitive, Transition::fade_in(ms(ENTER_TRANSITION_MS)), pacing)
            .await
    }

    async fn create_with<T: Entity>(
        &self,
        tag: CommandTag,
        entity: T,
        primitive: Primitive,
        enter: Transition,
        pacing: Pacing,
    ) -> Result<(), CommandError> {
        let enter = pacing.transition(enter);
        {
            let mut guard = self.scene.borrow_mut();
            let scene = &mut *guard;
            let id = entity.id().clone();
            scene
                .store
                .insert(entity)
                .map_err(|e| CommandError::rejected(tag, e.to_string()))?;
            scene.renderer.show(T::KIND, &id, primitive, enter);
        }
        pacing.wait(enter.duration).await;
        Ok(())
    }

    /// Fade out, then drop from the store unless the id was re-created meanwhile.
    async fn delete<T: Entity>(
        &self,
        tag: CommandTag,
        id: &EntityId,
        pacing: Pacing,
    ) -> Result<(), CommandError> {
        let exit = pacing.transition(Transition::fade_out(ms(EXIT_TRANSITION_MS)));
        let ticket = {
            let mut scene = self.scene.borrow_mut();
            if !scene.store.contains::<T>(id.as_str()) {
                return Err(CommandError::dangling(tag, T::KIND, id));
            }
            if !scene.renderer.contains(id.as_str()) {
                scene.store.remove::<T>(id.as_str());
                return Ok(());
            }
            scene.renderer.begin_exit(id, exit)
        };

        // Already exiting: the delete that started the exit finishes it.
        let Some(ticket) = ticket else {
            return Ok(());
        };

        pacing.wait(exit.duration).await;

        let mut scene = self.scene.borrow_mut();
        if scene.renderer.finish_exit(&ticket) {
            scene.store.remove::<T>(id.as_str());
        } else {
            tracing::debug!(%id, %tag, "exit superseded by re-create");
        }
        Ok(())
    }

    fn require_nodes(&self, tag: CommandTag, ids: &[EntityId]) -> Result<(), CommandError> {
        let store = self.store();
        match ids.iter().find(|id| !store.contains::<Node>(id.as_str())) {
            Some(missing) => Err(CommandError::dangling(tag, EntityKind::Node, missing)),
            None => Ok(()),
        }
    }

    /// Show `highlight` on a node for `hold`, then redraw it from the store.
    async fn flash_node(&self, id: &EntityId, highlight: Highlight, hold: Duration, pacing: Pacing) {
        self.scene.borrow_mut().redraw_node(id, Some(highlight));
        pacing.wait(hold).await;
        self.scene.borrow_mut().redraw_node(id, None);
    }

    async fn create_node(&self, p: model::CreateNode, pacing: Pacing) -> Result<(), CommandError> {
        let node = Node {
            id: p.id,
            value: p.value,
            position: p.position.into(),
            style: p.style,
        };
        let id = node.id.clone();
        let primitive = build::node(&node, None);
        let enter = pacing.transition(Transition::fade_in(ms(ENTER_TRANSITION_MS)));
        {
            let mut guard = self.scene.borrow_mut();
            let scene = &mut *guard;
            scene
                .store
                .insert(node)
                .map_err(|e| CommandError::rejected(CommandTag::CreateNode, e.to_string()))?;
            scene.renderer.show(EntityKind::Node, &id, primitive, enter);
            scene.redraw_edges_of(id.as_str());
        }
        pacing.wait(enter.duration).await;
        Ok(())
    }

    fn update_node(&self, p: model::UpdateNode) -> Result<(), CommandError> {
        let mut guard = self.scene.borrow_mut();
        let scene = &mut *guard;
        let node = scene
            .store
            .get_mut::<Node>(p.id.as_str())
            .ok_or_else(|| CommandError::dangling(CommandTag::UpdateNode, EntityKind::Node, &p.id))?;
        if let Some(value) = p.value {
            node.value = value;
        }
        if let Some(style) = p.style.filter(|s| !s.is_empty()) {
            node.style = Some(style);
        }
        scene.redraw_node(&p.id, None);
        Ok(())
    }

    async fn move_node(&self, p: model::MoveNode, pacing: Pacing) -> Result<(), CommandError> {
        let tag = CommandTag::MoveNode;
        let ease = match p.easing.as_deref() {
            None => Default::default(),
            Some(name) => parse_ease(name).unwrap_or_else(|e| {
                tracing::warn!(%e, "falling back to ease-in-out");
                Default::default()
            }),
        };
        let duration = p.duration.as_duration();
        let to: Point = p.to.into();
        let transition = {
            let mut guard = self.scene.borrow_mut();
            let scene = &mut *guard;
            let node = scene
                .store
                .get_mut::<Node>(p.id.as_str())
                .ok_or_else(|| CommandError::dangling(tag, EntityKind::Node, &p.id))?;
            let from = std::mem::replace(&mut node.position, to);
            let transition = pacing.transition(Transition::move_between(from, to, duration, ease));
            scene.renderer.move_to(&p.id, to, transition);
            transition
        };
        pacing.wait(transition.duration).await;
        self.scene.borrow_mut().redraw_edges_of(p.id.as_str());
        Ok(())
    }

    async fn compare(&self, p: model::Compare, pacing: Pacing) -> Result<(), CommandError> {
        self.require_nodes(CommandTag::Compare, &p.elements)?;
        let neutral = Highlight {
            color: Rgba8::AMBER,
            intensity: Intensity::Medium,
        };
        let verdict = Highlight {
            color: if p.result { Rgba8::GREEN } else { Rgba8::RED },
            intensity: Intensity::High,
        };

        let set_all = |h: Option<Highlight>| {
            let mut scene = self.scene.borrow_mut();
            for id in &p.elements {
                scene.redraw_node(id, h);
            }
        };

        set_all(Some(neutral));
        pacing.wait(ms(COMPARE_RESULT_DELAY_MS)).await;
        set_all(Some(verdict));
        pacing.wait(ms(COMPARE_RESULT_HOLD_MS)).await;
        set_all(Some(neutral));
        pacing
            .wait(ms(
                COMPARE_TOTAL_MS - COMPARE_RESULT_DELAY_MS - COMPARE_RESULT_HOLD_MS,
            ))
            .await;
        set_all(None);
        Ok(())
    }

    async fn create_edge(&self, p: model::CreateEdge, pacing: Pacing) -> Result<(), CommandError> {
        let tag = CommandTag::CreateEdge;
        let edge = Edge {
            id: p.id,
            from: p.from,
            to: p.to,
            directed: p.directed,
            weight: p.weight,
            line: LineStyle::from_name(p.style.as_deref()),
        };
        let primitive = {
            let scene = self.scene.borrow();
            for end in [&edge.from, &edge.to] {
                if !scene.store.contains::<Node>(end.as_str()) {
                    return Err(CommandError::dangling(tag, EntityKind::Node, end));
                }
            }
            scene
                .edge_primitive(&edge)
                .ok_or_else(|| CommandError::dangling(tag, EntityKind::Node, &edge.from))?
        };
        self.create_with(tag, edge, primitive, Transition::draw_in(ms(EDGE_DRAW_MS)), pacing)
            .await
    }

    async fn highlight_path(
        &self,
        p: model::HighlightPath,
        pacing: Pacing,
    ) -> Result<(), CommandError> {
        self.require_nodes(CommandTag::HighlightPath, &p.nodes)?;
        let h = Highlight {
            color: Rgba8::parse_or(p.color.as_deref(), Rgba8::CYAN),
            intensity: Intensity::High,
        };

        if p.sequential {
            let flashes = p.nodes.iter().enumerate().map(|(i, id)| async move {
                pacing.wait(ms(PATH_STAGGER_MS * i as u64)).await;
                self.flash_node(id, h, ms(PATH_HOLD_MS), pacing).await;
            });
            join_all(flashes).await;
        } else {
            let hold = p.duration.as_duration();
            join_all(p.nodes.iter().map(|id| self.flash_node(id, h, hold, pacing))).await;
        }
        Ok(())
    }

    async fn create_array(&self, p: model::CreateArray, pacing: Pacing) -> Result<(), CommandError> {
        let array = ArrayEntity {
            id: p.id,
            cells: p.values,
            anchor: p.position.into(),
        };
        let id = array.id.clone();
        let primitive = build::array(&array, &[]);
        self.create(CommandTag::CreateArray, array, primitive, pacing)
            .await?;
        self.scene.borrow_mut().redraw_pointers_of(id.as_str());
        Ok(())
    }

    fn check_cell(
        &self,
        tag: CommandTag,
        array: &EntityId,
        indices: &[usize],
    ) -> Result<(), CommandError> {
        let store = self.store();
        let arr = store
            .get::<ArrayEntity>(array.as_str())
            .ok_or_else(|| CommandError::dangling(tag, EntityKind::Array, array))?;
        match indices.iter().find(|i| !arr.contains(**i)) {
            Some(index) => Err(CommandError::OutOfBounds {
                tag,
                array: array.clone(),
                index: *index,
                len: arr.cells.len(),
            }),
            None => Ok(()),
        }
    }

    async fn swap(&self, p: model::Swap, pacing: Pacing) -> Result<(), CommandError> {
        let (i, j) = p.indices;
        self.check_cell(CommandTag::Swap, &p.array_id, &[i, j])?;
        {
            let mut guard = self.scene.borrow_mut();
            let scene = &mut *guard;
            if let Some(arr) = scene.store.get_mut::<ArrayEntity>(p.array_id.as_str()) {
                arr.cells.swap(i, j);
            }
            let tint = Rgba8::AMBER.tint();
            scene.redraw_array(&p.array_id, &[(i, tint), (j, tint)]);
        }
        pacing.wait(p.duration.as_duration()).await;
        self.scene.borrow_mut().redraw_array(&p.array_id, &[]);
        Ok(())
    }

    async fn update_cell(&self, p: model::UpdateCell, pacing: Pacing) -> Result<(), CommandError> {
        self.check_cell(CommandTag::UpdateCell, &p.array_id, &[p.index])?;
        {
            let mut guard = self.scene.borrow_mut();
            let scene = &mut *guard;
            if let Some(arr) = scene.store.get_mut::<ArrayEntity>(p.array_id.as_str()) {
                arr.cells[p.index] = p.value;
            }
            let tinted = if p.highlight {
                vec![(p.index, Rgba8::GREEN.tint())]
            } else {
                Vec::new()
            };
            scene.redraw_array(&p.array_id, &tinted);
        }
        if p.highlight {
            pacing.wait(ms(CELL_HIGHLIGHT_MS)).await;
            self.scene.borrow_mut().redraw_array(&p.array_id, &[]);
        }
        Ok(())
    }

    async fn set_pointer(&self, p: model::SetPointer, pacing: Pacing) -> Result<(), CommandError> {
        let tag = CommandTag::SetPointer;
        self.check_cell(tag, &p.array_id, &[p.index])?;
        let pointer = Pointer {
            label: p.label.map(|l| l.0).unwrap_or_default(),
            id: p.id,
            array: p.array_id,
            index: p.index,
            color: Rgba8::parse_or(p.color.as_deref(), Rgba8::CYAN),
        };
        let primitive = {
            let store = self.store();
            let arr = store
                .get::<ArrayEntity>(pointer.array.as_str())
                .ok_or_else(|| CommandError::dangling(tag, EntityKind::Array, &pointer.array))?;
            build::pointer(&pointer, arr)
        };
        self.create(tag, pointer, primitive, pacing).await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/command/interpreter.rs"]
mod tests;
