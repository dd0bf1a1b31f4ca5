//! Line-oriented simulation scripts.
//!
//! Each non-empty line is one command; `#` starts a comment.
//!
//! ```text
//! spawn <actor> [player] [combat] [speed=<value>]
//! despawn <actor>
//! skill <actor> <attribute> <value>
//! equip <actor> bow|crossbow|none
//! spell <actor> left|right none
//! spell <actor> left|right <name> [<school>|none] [speed]
//! trigger <actor> <trigger>
//! status
//! clear-all
//! ```
//!
//! Actors are written as `player`, a decimal id or a `0x` hex id. After every
//! command the runner prints the speed of every spawned actor.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use slowdown_core::{ActorId, Hand, RangedKind, SlowdownConfig};
use slowdown_runtime::{
    AnimationTrigger, Attribute, InMemoryHost, SimActor, SlowdownEngine, SlowdownService,
    SpellInfo, TriggerRouter,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid {what} `{value}`")]
    Invalid { what: &'static str, value: String },

    #[error("unexpected argument `{0}`")]
    Unexpected(String),
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Spawn {
        actor: ActorId,
        player: bool,
        in_combat: bool,
        speed: Option<f32>,
    },
    Despawn(ActorId),
    Skill {
        actor: ActorId,
        attribute: Attribute,
        value: f32,
    },
    Equip {
        actor: ActorId,
        ranged: Option<RangedKind>,
    },
    Spell {
        actor: ActorId,
        hand: Hand,
        spell: Option<SpellInfo>,
    },
    Trigger {
        actor: ActorId,
        trigger: AnimationTrigger,
    },
    Status,
    ClearAll,
}

impl Command {
    /// Parses a line. Blank lines and comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.split('#').next().unwrap_or_default().trim();
        let mut args = line.split_whitespace();
        let Some(name) = args.next() else {
            return Ok(None);
        };

        let command = match name {
            "spawn" => {
                let actor = parse_actor(&mut args)?;
                let (mut player, mut in_combat, mut speed) = (false, false, None);
                for flag in args.by_ref() {
                    match flag {
                        "player" => player = true,
                        "combat" => in_combat = true,
                        _ => match flag.strip_prefix("speed=") {
                            Some(value) => speed = Some(parse_value("speed", value)?),
                            None => return Err(ParseError::Unexpected(flag.to_owned())),
                        },
                    }
                }
                Self::Spawn {
                    actor,
                    player,
                    in_combat,
                    speed,
                }
            }
            "despawn" => Self::Despawn(parse_actor(&mut args)?),
            "skill" => Self::Skill {
                actor: parse_actor(&mut args)?,
                attribute: parse_next(&mut args, "attribute")?,
                value: parse_next(&mut args, "skill value")?,
            },
            "equip" => {
                let actor = parse_actor(&mut args)?;
                let ranged = match next(&mut args, "ranged weapon")? {
                    "none" => None,
                    kind => Some(parse_value("ranged weapon", kind)?),
                };
                Self::Equip { actor, ranged }
            }
            "spell" => {
                let actor = parse_actor(&mut args)?;
                let hand = parse_next(&mut args, "hand")?;
                let spell = match next(&mut args, "spell name")? {
                    "none" => None,
                    name => Some(parse_spell(name, &mut args)?),
                };
                Self::Spell { actor, hand, spell }
            }
            "trigger" => Self::Trigger {
                actor: parse_actor(&mut args)?,
                trigger: parse_next(&mut args, "trigger")?,
            },
            "status" => Self::Status,
            "clear-all" => Self::ClearAll,
            other => return Err(ParseError::UnknownCommand(other.to_owned())),
        };

        match args.next() {
            Some(extra) => Err(ParseError::Unexpected(extra.to_owned())),
            None => Ok(Some(command)),
        }
    }
}

fn next<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<&'a str, ParseError> {
    args.next().ok_or(ParseError::Missing(what))
}

fn parse_value<T: FromStr>(what: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::Invalid {
        what,
        value: value.to_owned(),
    })
}

fn parse_next<'a, T: FromStr>(
    args: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<T, ParseError> {
    parse_value(what, next(args, what)?)
}

fn parse_actor<'a>(args: &mut impl Iterator<Item = &'a str>) -> Result<ActorId, ParseError> {
    let value = next(args, "actor")?;
    let parsed = match value {
        "player" => Ok(ActorId::PLAYER.0),
        _ => match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => value.parse(),
        },
    };
    parsed.map(ActorId).map_err(|_| ParseError::Invalid {
        what: "actor",
        value: value.to_owned(),
    })
}

fn parse_spell<'a>(
    name: &str,
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<SpellInfo, ParseError> {
    let school = match args.next() {
        None | Some("none") => None,
        Some(school) => Some(parse_value("school", school)?),
    };
    let spell = SpellInfo::new(name, school);
    match args.next() {
        None => Ok(spell),
        Some("speed") => Ok(spell.modifying_speed()),
        Some(other) => Err(ParseError::Unexpected(other.to_owned())),
    }
}

/// Drives an engine over an in-memory host from script commands.
pub struct ScriptRunner {
    host: Arc<InMemoryHost>,
    engine: Arc<SlowdownEngine>,
    router: TriggerRouter,
}

impl ScriptRunner {
    pub fn new(config: SlowdownConfig) -> Result<Self> {
        let config = Arc::new(config);
        let host = Arc::new(InMemoryHost::with_config_effects(&config));
        let engine = Arc::new(
            SlowdownEngine::initialize(host.clone(), config.clone())
                .context("Failed to initialize slowdown engine")?,
        );
        let router = TriggerRouter::new(engine.clone(), host.clone(), host.clone(), config);

        Ok(Self {
            host,
            engine,
            router,
        })
    }

    /// Runs every line of `input`, stopping at the first malformed one.
    pub fn run(&self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        for (index, line) in input.lines().enumerate() {
            let line = line.context("Failed to read script")?;
            let command = Command::parse(&line)
                .with_context(|| format!("line {}: `{}`", index + 1, line.trim()))?;

            if let Some(command) = command {
                debug!(line = index + 1, ?command, "Executing script command");
                writeln!(out, "> {}", line.trim())?;
                self.execute(&command, out)?;
            }
        }
        Ok(())
    }

    pub fn execute(&self, command: &Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Spawn {
                actor,
                player,
                in_combat,
                speed,
            } => {
                let mut sim = if *player {
                    SimActor::player()
                } else {
                    SimActor::new()
                };
                sim.in_combat = *in_combat;
                if let Some(speed) = speed {
                    sim = sim.with_attribute(Attribute::SpeedMult, *speed);
                }
                self.host.spawn(*actor, sim);
            }
            Command::Despawn(actor) => {
                if self.host.despawn(*actor).is_none() {
                    warn!(%actor, "Despawn of unknown actor");
                }
            }
            Command::Skill {
                actor,
                attribute,
                value,
            } => {
                if !self.host.set_attribute(*actor, *attribute, *value) {
                    warn!(%actor, %attribute, "Skill set on unknown actor");
                }
            }
            Command::Equip { actor, ranged } => {
                if !self.host.update(*actor, |sim| sim.ranged = *ranged) {
                    warn!(%actor, "Equip on unknown actor");
                }
            }
            Command::Spell { actor, hand, spell } => {
                if !self.host.select_spell(*actor, *hand, spell.clone()) {
                    warn!(%actor, %hand, "Spell selected on unknown actor");
                }
            }
            Command::Trigger { actor, trigger } => self.router.handle(*actor, *trigger),
            Command::Status => return self.print_status(out),
            Command::ClearAll => self.engine.clear_all(),
        }

        self.print_speeds(out)
    }

    fn print_speeds(&self, out: &mut impl Write) -> Result<()> {
        for actor in self.host.actor_ids() {
            let Some(speed) = self.host.speed(actor) else {
                continue;
            };
            let marker = if self.engine.is_actor_slowed(actor) {
                " (slowed)"
            } else {
                ""
            };
            writeln!(out, "  {actor}: speed {speed:.2}{marker}")?;
        }
        Ok(())
    }

    fn print_status(&self, out: &mut impl Write) -> Result<()> {
        let dual_enabled = self.engine.config().enable_dual_cast;
        for actor in self.host.actor_ids() {
            let speed = self.host.speed(actor).unwrap_or_default();
            match self.engine.snapshot(actor) {
                Some(state) => {
                    let governing = state
                        .governing(dual_enabled)
                        .map_or_else(|| "none".to_owned(), |g| g.category.to_string());
                    writeln!(
                        out,
                        "  {actor}: speed {speed:.2} phase {} governing {governing} baseline {:+.2}",
                        state.phase(),
                        state.baseline_offset(),
                    )?;
                }
                None => writeln!(out, "  {actor}: speed {speed:.2} idle")?,
            }
        }
        writeln!(out, "  tracked actors: {}", self.engine.tracked_actors())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> String {
        let runner = ScriptRunner::new(SlowdownConfig::default()).unwrap();
        let mut out = Vec::new();
        runner.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(
            Command::parse("spawn 0x20 combat speed=90").unwrap(),
            Some(Command::Spawn {
                actor: ActorId(0x20),
                player: false,
                in_combat: true,
                speed: Some(90.0),
            })
        );
        assert_eq!(
            Command::parse("spell player left Flames destruction speed").unwrap(),
            Some(Command::Spell {
                actor: ActorId::PLAYER,
                hand: Hand::Left,
                spell: Some(
                    SpellInfo::new("Flames", Some(Attribute::Destruction)).modifying_speed()
                ),
            })
        );
        assert_eq!(
            Command::parse("equip 7 crossbow").unwrap(),
            Some(Command::Equip {
                actor: ActorId(7),
                ranged: Some(RangedKind::Crossbow),
            })
        );
        assert_eq!(
            Command::parse("trigger 7 begin-cast-right").unwrap(),
            Some(Command::Trigger {
                actor: ActorId(7),
                trigger: AnimationTrigger::BeginCast(Hand::Right),
            })
        );
        assert_eq!(Command::parse("clear-all").unwrap(), Some(Command::ClearAll));
        assert_eq!(Command::parse("   # comment").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            Command::parse("jump 1"),
            Err(ParseError::UnknownCommand("jump".to_owned()))
        );
        assert_eq!(
            Command::parse("skill 1 archery"),
            Err(ParseError::Missing("skill value"))
        );
        assert_eq!(
            Command::parse("despawn 1 2"),
            Err(ParseError::Unexpected("2".to_owned()))
        );
        assert!(matches!(
            Command::parse("trigger 1 bowRelease"),
            Err(ParseError::Invalid { what: "trigger", .. })
        ));
    }

    #[test]
    fn bow_session_prints_speeds() {
        let output = run(
            "spawn player player\n\
             skill player archery 40\n\
             trigger player bow-drawn\n\
             trigger player bow-released\n",
        );

        assert!(output.contains("> trigger player bow-drawn\n  0x14: speed 60.00 (slowed)"));
        assert!(output.ends_with("> trigger player bow-released\n  0x14: speed 100.00\n"));
    }

    #[test]
    fn status_reports_phase() {
        let output = run(
            "spawn player player\n\
             spell player left Flames destruction\n\
             spell player right Flames destruction\n\
             trigger player begin-cast-left\n\
             trigger player begin-cast-right\n\
             status\n",
        );

        assert!(output.contains("0x14: speed 40.00 phase dual_cast_active governing cast-dual"));
        assert!(output.contains("tracked actors: 1"));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let runner = ScriptRunner::new(SlowdownConfig::default()).unwrap();
        let err = runner
            .run("status\nfly 1\n".as_bytes(), &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
