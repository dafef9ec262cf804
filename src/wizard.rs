//! Terminal rendition of the evaluation intake: one prompt block per step.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use stimacasa::api::{AddressValidationRequest, ApiClient};
use stimacasa::intake::{
    Advance, AnswersPatch, Contact, FlowError, FormAnswers, Heating, IntakeFlow, IntakeStep,
    PropertyCondition, PropertyType, SubmissionReceipt, SubmitError, KNOWN_FEATURES,
};
use tracing::warn;

use crate::views;

/// Typed at any step prompt to return to the previous page.
pub const BACK: &str = "<";

/// What the user did with one step's prompt block.
#[derive(Debug)]
enum StepInput {
    Patch(AnswersPatch),
    Back,
    Quit,
}

#[derive(Debug)]
pub enum WizardOutcome {
    Ready,
    Abandoned,
}

/// Line-oriented prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Read one trimmed line; `None` at end of input.
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn choose<T: Copy + FromStr>(
        &mut self,
        label: &str,
        choices: &[(T, &str)],
    ) -> io::Result<Option<Answer<Option<T>>>> {
        for (position, (_, text)) in choices.iter().enumerate() {
            writeln!(self.output, "  {}) {text}", position + 1)?;
        }
        let Some(raw) = self.ask(label)? else {
            return Ok(None);
        };
        if raw == BACK {
            return Ok(Some(Answer::Back));
        }
        let picked = match raw.parse::<usize>() {
            Ok(position) => position
                .checked_sub(1)
                .and_then(|index| choices.get(index))
                .map(|(choice, _)| *choice),
            Err(_) => raw.parse::<T>().ok(),
        };
        Ok(Some(Answer::Value(picked)))
    }

    /// Whole-number answer. Blank input is an unanswered field; other text is asked again.
    fn number(&mut self, label: &str) -> io::Result<Option<Answer<Option<i64>>>> {
        loop {
            let Some(raw) = self.ask(label)? else {
                return Ok(None);
            };
            if raw == BACK {
                return Ok(Some(Answer::Back));
            }
            if raw.is_empty() {
                return Ok(Some(Answer::Value(None)));
            }
            match parse_whole(&raw) {
                Some(value) => return Ok(Some(Answer::Value(Some(value)))),
                None => writeln!(self.output, "! {NOT_A_NUMBER}")?,
            }
        }
    }

    fn text(&mut self, label: &str) -> io::Result<Option<Answer<String>>> {
        Ok(self.ask(label)?.map(|raw| {
            if raw == BACK {
                Answer::Back
            } else {
                Answer::Value(raw)
            }
        }))
    }
}

pub const NOT_A_NUMBER: &str = "Valore non numerico, inserisci un numero intero";

/// Integer text saturates at the `i64` bounds instead of failing.
fn parse_whole(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Negative counts become 0 so the range check, not the presence check, rejects them.
fn count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn level(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

enum Answer<T> {
    Value(T),
    Back,
}

macro_rules! answer {
    ($read:expr) => {
        match $read? {
            None => return Ok(StepInput::Quit),
            Some(Answer::Back) => return Ok(StepInput::Back),
            Some(Answer::Value(value)) => value,
        }
    };
}

fn read_step<R: BufRead, W: Write>(
    step: IntakeStep,
    prompter: &mut Prompter<R, W>,
) -> io::Result<StepInput> {
    let patch = match step {
        IntakeStep::Location => {
            AnswersPatch::new().address(answer!(prompter.text("Indirizzo (es: Via Roma 10)")))
        }
        IntakeStep::PropertyType => {
            let choices = PropertyType::ALL.map(|kind| (kind, kind.label()));
            AnswersPatch::new().property_type(answer!(prompter.choose("Tipologia", &choices)))
        }
        IntakeStep::Condition => {
            let choices = PropertyCondition::ALL.map(|condition| (condition, condition.label()));
            AnswersPatch::new().condition(answer!(prompter.choose("Stato", &choices)))
        }
        IntakeStep::GeneralCharacteristics => {
            let surface = answer!(prompter.number("Superficie (mq)")).map(count);
            let floor = answer!(prompter.number("Piano")).map(level);
            let rooms = answer!(prompter.number("Locali")).map(count);
            let bathrooms = answer!(prompter.number("Bagni")).map(count);
            let choices = Heating::ALL.map(|heating| (heating, heating.code()));
            let heating = answer!(prompter.choose("Riscaldamento", &choices));
            AnswersPatch::new()
                .surface_sqm(surface)
                .floor(floor)
                .room_count(rooms)
                .bathroom_count(bathrooms)
                .heating(heating)
        }
        IntakeStep::Features => {
            let label = format!("Dotazioni, separate da virgola ({})", KNOWN_FEATURES.join(", "));
            let raw = answer!(prompter.text(&label));
            AnswersPatch::new().features(raw.split(','))
        }
        IntakeStep::Contacts => {
            let first_name = answer!(prompter.text("Nome"));
            let last_name = answer!(prompter.text("Cognome"));
            let email = answer!(prompter.text("Email"));
            let phone = answer!(prompter.text("Telefono"));
            AnswersPatch::new().contact(Contact {
                first_name,
                last_name,
                email,
                phone,
            })
        }
    };
    Ok(StepInput::Patch(patch))
}

/// Walk the flow step by step until the last page validates or input ends.
///
/// With `address_check`, the location step also asks the backend for suggestions;
/// the local address rule still decides whether the flow advances.
pub async fn run_interactive<R: BufRead, W: Write>(
    flow: &mut IntakeFlow,
    prompter: &mut Prompter<R, W>,
    address_check: Option<&ApiClient>,
) -> io::Result<WizardOutcome> {
    loop {
        let Some(step) = flow.current_step() else {
            return Ok(WizardOutcome::Abandoned);
        };
        writeln!(
            prompter.output(),
            "\nPasso {}/{}: {}  (digita {BACK} per tornare indietro)",
            flow.cursor() + 1,
            flow.total_steps(),
            step.title()
        )?;

        match read_step(step, prompter)? {
            StepInput::Quit => return Ok(WizardOutcome::Abandoned),
            StepInput::Back => {
                flow.prev();
                continue;
            }
            StepInput::Patch(patch) => flow.update(patch).map_err(io_from_flow)?,
        }

        if step == IntakeStep::Location {
            if let Some(client) = address_check {
                suggest_addresses(client, &flow.answers().address, prompter).await?;
            }
        }

        match flow.next().map_err(io_from_flow)? {
            Advance::Moved { .. } => {}
            Advance::Blocked { message, .. } => writeln!(prompter.output(), "! {message}")?,
            Advance::ReadyToSubmit => return Ok(WizardOutcome::Ready),
        }
    }
}

async fn suggest_addresses<R: BufRead, W: Write>(
    client: &ApiClient,
    address: &str,
    prompter: &mut Prompter<R, W>,
) -> io::Result<()> {
    let Some(citta) = prompter.ask("Città (facoltativa)")? else {
        return Ok(());
    };
    let request = AddressValidationRequest {
        via: address.to_string(),
        citta,
    };
    match client.validate_address(&request).await {
        Ok(response) if response.valid => {}
        Ok(response) => {
            writeln!(prompter.output(), "Indirizzo non riconosciuto.")?;
            for suggestion in response.suggestions {
                writeln!(prompter.output(), "  forse: {suggestion}")?;
            }
        }
        Err(err) => warn!(error = %err, "address check unavailable"),
    }
    Ok(())
}

fn io_from_flow(err: FlowError) -> io::Error {
    io::Error::other(err)
}

/// Load a complete answer set into the flow and advance through every step.
///
/// Stops at the first step whose rule fails.
pub fn run_scripted(flow: &mut IntakeFlow, answers: FormAnswers) -> Result<(), FlowError> {
    flow.update(patch_from(answers))?;
    loop {
        match flow.next()? {
            Advance::Moved { .. } => {}
            Advance::Blocked { step, message } => return Err(FlowError::Invalid { step, message }),
            Advance::ReadyToSubmit => return Ok(()),
        }
    }
}

fn patch_from(answers: FormAnswers) -> AnswersPatch {
    AnswersPatch::new()
        .address(answers.address)
        .property_type(answers.property_type)
        .condition(answers.condition)
        .surface_sqm(answers.surface_sqm)
        .floor(answers.floor)
        .room_count(answers.room_count)
        .bathroom_count(answers.bathroom_count)
        .heating(answers.heating)
        .features(answers.features)
        .contact(answers.contact)
}

/// Submit, offering a retry after each failure; `None` when the user gives up.
pub async fn submit_with_retry<R: BufRead, W: Write>(
    flow: &mut IntakeFlow,
    client: &ApiClient,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Option<SubmissionReceipt>> {
    loop {
        match flow.submit(client).await {
            Ok(receipt) => return Ok(Some(receipt)),
            Err(SubmitError::Flow(err)) => return Err(io_from_flow(err)),
            Err(err) => {
                writeln!(prompter.output(), "{}", views::submit_failure(&err))?;
                let retry = prompter.ask("Riprovare? (s/n)")?;
                if !matches!(retry.as_deref(), Some("s") | Some("S") | Some("si")) {
                    return Ok(None);
                }
            }
        }
    }
}
