use super::state::{ActivePour, SimulationEvent, SimulationObserver, SimulationState};
use crate::{
    catalog::{BarContext, LiquorLookup},
    container::Container,
    error::BarkeepError,
    logger::TimeSeriesLogger,
    recognition::{RecipeMatcher, RecognitionResult},
    serving::{self, ServeOutcome},
    shake::{PressOutcome, ShakeMinigame, SHAKE_AGITATION},
};
use barkeep_schemas::{
    command::Command,
    condition::{Condition, ContainerParameter},
    container::{ContainerDefinition, ContainerKind},
    scenario::Scenario,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

pub struct SimulationEngine {
    pub(super) state: SimulationState,
    pub(super) context: BarContext,
    pub(super) definitions: HashMap<String, ContainerDefinition>,
    pub(super) scenario: Scenario,
    pub(super) current_step_index: usize,
    pub(super) step_entered: bool,
    pub(super) max_ticks: u64,
    pub(super) shake_seconds: f64,
    pub(super) logger: Option<TimeSeriesLogger>,
}

impl SimulationEngine {
    /// Drives the scenario to its end with a fixed time step.
    pub fn run(&mut self, dt: f64) -> Result<(), BarkeepError> {
        check_time_step(dt)?;
        println!("--- Running scenario: {} ---", self.scenario.scenario_name);

        if let Some(logger) = &mut self.logger {
            logger.log_state(&self.state, "INITIAL")?;
        }

        loop {
            // The tick method will return false when the scenario is complete
            if !self.tick(dt)? {
                break;
            }
        }
        println!("Scenario Complete.");
        Ok(())
    }

    /// One scripted tick: enter the current step if needed, advance a frame, then
    /// move on when the step's condition holds. Returns false once every step is done.
    pub fn tick(&mut self, dt: f64) -> Result<bool, BarkeepError> {
        check_time_step(dt)?;
        if self.current_step_index >= self.scenario.steps.len() {
            return Ok(false);
        }
        if self.state.tick >= self.max_ticks {
            return Err(BarkeepError::ScenarioTimeout(
                self.scenario.scenario_id.clone(),
                self.max_ticks,
            ));
        }

        self.state.events.clear();

        if !self.step_entered {
            let step = self.scenario.steps[self.current_step_index].clone();
            println!("--- Entering step: {} ---", step.step_id);
            for command in step.on_enter {
                self.execute_command(command)?;
            }
            self.step_entered = true;
        }

        self.advance_frame(dt)?;

        let step = &self.scenario.steps[self.current_step_index];
        let step_id = step.step_id.clone();
        let done = self.evaluate_condition(&step.until)?;

        if let Some(logger) = &mut self.logger {
            logger.log_state(&self.state, &step_id)?;
        }

        if done {
            self.current_step_index += 1;
            self.step_entered = false;
            self.state.time_in_step_s = 0.0;
            if self.current_step_index >= self.scenario.steps.len() {
                println!("--- Reached end of scenario ---");
            }
        }

        Ok(true)
    }

    /// One unscripted frame for hosts that issue commands themselves.
    pub fn frame(&mut self, dt: f64) -> Result<(), BarkeepError> {
        check_time_step(dt)?;
        self.state.events.clear();
        self.advance_frame(dt)
    }

    fn advance_frame(&mut self, dt: f64) -> Result<(), BarkeepError> {
        self.state.tick += 1;
        self.state.elapsed_s += dt;
        self.state.time_in_step_s += dt;

        self.advance_pours(dt)?;

        for (id, container) in self.state.containers.iter_mut() {
            let agitation = if self.state.shakes.contains_key(id) {
                SHAKE_AGITATION
            } else {
                1.0
            };
            container.tick(dt, agitation);
        }

        let mut completed = Vec::new();
        for (id, shake) in self.state.shakes.iter_mut() {
            if shake.tick(dt) {
                completed.push((id.clone(), shake.quality()));
            }
        }
        for (container_id, quality) in completed {
            self.state.shakes.remove(&container_id);
            match self.state.containers.get_mut(&container_id) {
                Some(container) if !container.contents().is_empty() => {
                    container.contents_mut().mark_shaken();
                }
                _ => debug!(container = %container_id, "shake finished with nothing to shake"),
            }
            debug!(container = %container_id, quality, "shake complete");
            self.state
                .events
                .push(SimulationEvent::ShakeComplete { container_id, quality });
        }

        Ok(())
    }

    fn advance_pours(&mut self, dt: f64) -> Result<(), BarkeepError> {
        let pours = std::mem::take(&mut self.state.pours);
        let mut still_pouring = Vec::with_capacity(pours.len());

        for pour in pours {
            let moved = self.transfer_between(
                &pour.source_id,
                &pour.target_id,
                pour.rate_ml_per_s * dt,
            )?;
            if moved > 0.0 {
                self.state.events.push(SimulationEvent::PourTick {
                    source_id: pour.source_id.clone(),
                    target_id: pour.target_id.clone(),
                    amount_ml: moved,
                });
                still_pouring.push(pour);
            } else {
                if let Some(source) = self.state.containers.get_mut(&pour.source_id) {
                    source.set_pouring(false);
                }
                self.state.events.push(SimulationEvent::PourStopped {
                    source_id: pour.source_id,
                    target_id: pour.target_id,
                });
            }
        }

        self.state.pours = still_pouring;
        Ok(())
    }

    /// Takes the source out of the map for the duration of the transfer so the two
    /// containers are borrowed independently.
    fn transfer_between(
        &mut self,
        source_id: &str,
        target_id: &str,
        amount_ml: f64,
    ) -> Result<f64, BarkeepError> {
        if source_id == target_id {
            return Err(BarkeepError::SelfTransfer(source_id.to_string()));
        }
        let mut source = self
            .state
            .containers
            .remove(source_id)
            .ok_or_else(|| BarkeepError::ContainerNotFound(source_id.to_string()))?;

        let result = match self.state.containers.get_mut(target_id) {
            Some(target) => Ok(source.transfer_to(target, amount_ml)),
            None => Err(BarkeepError::ContainerNotFound(target_id.to_string())),
        };

        self.state.containers.insert(source_id.to_string(), source);
        result
    }

    pub fn execute_command(&mut self, command: Command) -> Result<(), BarkeepError> {
        match command {
            Command::SpawnContainer {
                container_id,
                definition_id,
            } => {
                self.spawn_container(&container_id, &definition_id)?;
            }
            Command::AddLiquor {
                container_id,
                liquor_id,
                amount_ml,
            } => {
                let liquor = self
                    .context
                    .liquors
                    .get_liquor(&liquor_id)
                    .ok_or_else(|| BarkeepError::LiquorNotFound(liquor_id.clone()))?;
                let container = self
                    .state
                    .containers
                    .get_mut(&container_id)
                    .ok_or_else(|| BarkeepError::ContainerNotFound(container_id.clone()))?;
                let added = container.contents_mut().add_liquor(liquor, amount_ml);
                self.state.events.push(SimulationEvent::IngredientAdded {
                    container_id,
                    ingredient_id: liquor_id,
                    amount_ml: added,
                });
            }
            Command::AddIce {
                container_id,
                cubes,
            } => {
                self.container_mut(&container_id)?.add_ice(cubes);
                self.state
                    .events
                    .push(SimulationEvent::IceAdded { container_id, cubes });
            }
            Command::StartPour {
                source_id,
                target_id,
                rate_ml_per_s,
            } => {
                if source_id == target_id {
                    return Err(BarkeepError::SelfTransfer(source_id));
                }
                self.container(&target_id)?;
                self.container_mut(&source_id)?.set_pouring(true);
                self.state.pours.retain(|p| p.source_id != source_id);
                self.state.pours.push(ActivePour {
                    source_id: source_id.clone(),
                    target_id: target_id.clone(),
                    rate_ml_per_s: rate_ml_per_s.max(0.0),
                });
                self.state
                    .events
                    .push(SimulationEvent::PourStarted { source_id, target_id });
            }
            Command::StopPour { source_id } => {
                let (stopped, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.state.pours)
                    .into_iter()
                    .partition(|p| p.source_id == source_id);
                self.state.pours = kept;
                if let Some(source) = self.state.containers.get_mut(&source_id) {
                    source.set_pouring(false);
                }
                for pour in stopped {
                    self.state.events.push(SimulationEvent::PourStopped {
                        source_id: pour.source_id,
                        target_id: pour.target_id,
                    });
                }
            }
            Command::StartShake { container_id } => {
                let kind = self.container(&container_id)?.kind();
                if !matches!(kind, ContainerKind::Shaker | ContainerKind::MixingGlass) {
                    return Err(BarkeepError::NotShakeable(container_id));
                }
                let shake_seconds = self.shake_seconds;
                self.state
                    .shakes
                    .entry(container_id.clone())
                    .or_insert_with(|| ShakeMinigame::new(shake_seconds));
                self.state
                    .events
                    .push(SimulationEvent::ShakeStarted { container_id });
            }
            Command::ShakePress { container_id } => match self.state.shakes.get_mut(&container_id) {
                Some(shake) => {
                    let outcome = shake.press();
                    if outcome != PressOutcome::Ignored {
                        self.state.events.push(SimulationEvent::ShakePressed {
                            container_id,
                            hit: outcome == PressOutcome::Hit,
                        });
                    }
                }
                None => warn!(container = %container_id, "shake press without an active shake"),
            },
            Command::StopShake { container_id } => {
                if self.state.shakes.remove(&container_id).is_some() {
                    self.state
                        .events
                        .push(SimulationEvent::ShakeStopped { container_id });
                }
            }
            Command::Stir { container_id } => {
                self.container_mut(&container_id)?.contents_mut().mark_stirred();
                self.state
                    .events
                    .push(SimulationEvent::Stirred { container_id });
            }
            Command::SetTemperature {
                container_id,
                celsius,
            } => {
                self.container_mut(&container_id)?.set_temperature(celsius);
            }
            Command::Clear { container_id } => {
                self.container_mut(&container_id)?.clear();
                self.state.shakes.remove(&container_id);
                self.state
                    .events
                    .push(SimulationEvent::Cleared { container_id });
            }
            Command::Serve {
                container_id,
                order_recipe_id,
            } => {
                self.serve(&container_id, order_recipe_id.as_deref())?;
            }
        }
        Ok(())
    }

    pub fn spawn_container(&mut self, container_id: &str, definition_id: &str) -> Result<(), BarkeepError> {
        if self.state.containers.contains_key(container_id) {
            return Err(BarkeepError::DuplicateContainer(container_id.to_string()));
        }
        let definition = self
            .definitions
            .get(definition_id)
            .ok_or_else(|| BarkeepError::ContainerDefinitionNotFound(definition_id.to_string()))?;

        let mut container = Container::from_definition(container_id, definition);
        for fill in &definition.initial_fill {
            let liquor = self
                .context
                .liquors
                .get_liquor(&fill.liquor_id)
                .ok_or_else(|| BarkeepError::LiquorNotFound(fill.liquor_id.clone()))?;
            container.contents_mut().add_liquor(liquor, fill.amount_ml);
        }

        self.state
            .containers
            .insert(container_id.to_string(), container);
        self.state.events.push(SimulationEvent::ContainerSpawned {
            container_id: container_id.to_string(),
        });
        Ok(())
    }

    /// Recognizes the drink in a container, prices it against `order_recipe_id` and
    /// empties the container.
    pub fn serve(
        &mut self,
        container_id: &str,
        order_recipe_id: Option<&str>,
    ) -> Result<ServeOutcome, BarkeepError> {
        let recognition = self.recognize(container_id)?;
        let order = match order_recipe_id {
            Some(id) => Some(
                self.context
                    .recipes
                    .get(id)
                    .ok_or_else(|| BarkeepError::RecipeNotFound(id.to_string()))?,
            ),
            None => None,
        };

        let container = self.container(container_id)?;
        let outcome = serving::serve(&recognition, order, container.temperature_c());
        println!(
            "Served '{}' from {} (score {:.2}, paid ${:.2} + ${:.2} tip)",
            outcome.drink_name, container_id, outcome.score, outcome.payment, outcome.tip
        );

        self.state.pours.retain(|p| p.source_id != container_id && p.target_id != container_id);
        self.state.shakes.remove(container_id);
        self.container_mut(container_id)?.clear();
        self.state.served.push(outcome.clone());
        self.state.events.push(SimulationEvent::DrinkServed {
            container_id: container_id.to_string(),
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    pub fn recognize(&self, container_id: &str) -> Result<RecognitionResult, BarkeepError> {
        let container = self.container(container_id)?;
        let matcher = RecipeMatcher::new(
            &self.context.recipes,
            &self.context.aliases,
            &self.context.liquors,
        );
        Ok(matcher.recognize(
            &container.contents().ingredient_volumes(),
            container.contents().is_shaken(),
        ))
    }

    pub fn alcohol_content(&self, container_id: &str) -> Result<f64, BarkeepError> {
        Ok(self
            .container(container_id)?
            .contents()
            .calculate_alcohol_content(&self.context.liquors))
    }

    /// Hands the events of the last frame to `observer`.
    pub fn dispatch_events(&self, observer: &mut dyn SimulationObserver) {
        for event in &self.state.events {
            match event {
                SimulationEvent::PourTick {
                    source_id,
                    target_id,
                    amount_ml,
                } => observer.on_pour_tick(source_id, target_id, *amount_ml),
                SimulationEvent::ShakeComplete {
                    container_id,
                    quality,
                } => observer.on_shake_complete(container_id, *quality),
                SimulationEvent::DrinkServed {
                    container_id,
                    outcome,
                } => observer.on_drink_served(container_id, outcome),
                _ => {}
            }
            observer.on_event(event);
        }
    }

    fn evaluate_condition(&self, condition: &Condition) -> Result<bool, BarkeepError> {
        Ok(match condition {
            Condition::Always => true,
            Condition::TimeInStep { seconds } => self.state.time_in_step_s >= *seconds,
            Condition::ContainerValue {
                container_id,
                parameter,
                operator,
                value,
            } => {
                let container = self.container(container_id)?;
                let current_value = match parameter {
                    ContainerParameter::Volume => container.contents().volume_ml(),
                    ContainerParameter::Temperature => container.temperature_c(),
                    ContainerParameter::Abv => container
                        .contents()
                        .calculate_alcohol_content(&self.context.liquors),
                    ContainerParameter::Ice => container.ice_ml(),
                };
                operator.compare(current_value, *value)
            }
            Condition::ContainerShaken { container_id } => {
                self.container(container_id)?.contents().is_shaken()
            }
            Condition::PoursIdle => self.state.pours.is_empty(),
        })
    }

    fn container(&self, container_id: &str) -> Result<&Container, BarkeepError> {
        self.state
            .containers
            .get(container_id)
            .ok_or_else(|| BarkeepError::ContainerNotFound(container_id.to_string()))
    }

    fn container_mut(&mut self, container_id: &str) -> Result<&mut Container, BarkeepError> {
        self.state
            .containers
            .get_mut(container_id)
            .ok_or_else(|| BarkeepError::ContainerNotFound(container_id.to_string()))
    }

    pub fn get_tick(&self) -> u64 {
        self.state.tick
    }

    pub fn get_elapsed_seconds(&self) -> f64 {
        self.state.elapsed_s
    }

    pub fn get_container(&self, container_id: &str) -> Option<&Container> {
        self.state.containers.get(container_id)
    }

    pub fn get_containers(&self) -> &BTreeMap<String, Container> {
        &self.state.containers
    }

    pub fn get_events(&self) -> &[SimulationEvent] {
        &self.state.events
    }

    pub fn get_served(&self) -> &[ServeOutcome] {
        &self.state.served
    }

    pub fn get_context(&self) -> &BarContext {
        &self.context
    }

    pub fn get_scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn is_finished(&self) -> bool {
        self.current_step_index >= self.scenario.steps.len()
    }
}

fn check_time_step(dt: f64) -> Result<(), BarkeepError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(BarkeepError::InvalidTimeStep(dt))
    }
}
