//! User-visible text. Library errors and payloads are translated here and nowhere else.

use std::io::{self, Write};

use stimacasa::api::{
    ApiError, ContrattoChiuso, DashboardStatistics, ImmobileSummary, Incarico, PagedList, User,
    Valutazione,
};
use stimacasa::error::AppError;
use stimacasa::intake::{FlowError, SubmissionReceipt, SubmitError};
use stimacasa::session::{AuthError, Identity, Role, LOGIN_ROUTE};
use tracing::error;

pub const GENERIC_FAILURE: &str = "Si è verificato un errore. Riprova più tardi.";
pub const INVALID_CREDENTIALS: &str = "Credenziali non valide";

fn api_failure(err: &ApiError) -> String {
    if err.is_unauthorized() {
        return format!("{INVALID_CREDENTIALS}. Effettua di nuovo l'accesso ({LOGIN_ROUTE}).");
    }
    error!(error = %err, "request to backend failed");
    GENERIC_FAILURE.to_string()
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Admin => "amministratore",
        Role::Agent => "agente",
    }
}

/// Message printed when a command fails.
pub fn user_message(err: &AppError) -> String {
    match err {
        AppError::Api(err) => api_failure(err),
        AppError::Auth(AuthError::InvalidCredentials(message)) => {
            if message.trim().is_empty() {
                INVALID_CREDENTIALS.to_string()
            } else {
                format!("{INVALID_CREDENTIALS}: {message}")
            }
        }
        AppError::Auth(AuthError::Api(err)) => api_failure(err),
        AppError::Access(denied) => format!(
            "Sezione riservata al ruolo {}. Accedi con `stimacasa login` ({LOGIN_ROUTE}).",
            role_name(denied.required)
        ),
        AppError::Flow(FlowError::Invalid { message, .. }) => message.to_string(),
        AppError::Submit(err) => submit_failure(err),
        other => other.to_string(),
    }
}

pub fn submit_failure(err: &SubmitError) -> String {
    match err {
        SubmitError::Rejected(reason) => format!("Richiesta non accettata: {reason}"),
        SubmitError::Api(err) => api_failure(err),
        SubmitError::Flow(err) => err.to_string(),
    }
}

pub fn identity<W: Write>(out: &mut W, identity: Option<&Identity>) -> io::Result<()> {
    match identity {
        None => writeln!(out, "Nessun utente collegato."),
        Some(identity) => {
            let role = identity.role.map(role_name).unwrap_or("nessun ruolo");
            writeln!(out, "{} <{}> ({role})", identity.name, identity.email)
        }
    }
}

pub fn receipt<W: Write>(out: &mut W, receipt: &SubmissionReceipt) -> io::Result<()> {
    writeln!(out, "\nRichiesta di valutazione inviata.")?;
    if let Some(id) = receipt.id {
        writeln!(out, "Numero pratica: {id}")?;
    }
    if let Some(message) = &receipt.message {
        writeln!(out, "{message}")?;
    }
    writeln!(out, "Un nostro agente ti contatterà a breve.")
}

pub fn statistics<W: Write>(out: &mut W, stats: &DashboardStatistics) -> io::Result<()> {
    let named = [
        ("Immobili totali", stats.totale_immobili),
        ("Immobili disponibili", stats.immobili_disponibili),
        ("Valutazioni in corso", stats.valutazioni_in_corso),
        ("Contratti chiusi", stats.contratti_chiusi),
        ("Agenti attivi", stats.agenti_attivi),
        ("Incarichi attivi", stats.incarichi_attivi),
    ];
    for (label, value) in named {
        if let Some(value) = value {
            writeln!(out, "{label}: {value}")?;
        }
    }
    for (key, value) in &stats.other {
        writeln!(out, "{key}: {value}")?;
    }
    Ok(())
}

fn price(value: Option<f64>) -> String {
    value
        .map(|amount| format!("€ {amount:.0}"))
        .unwrap_or_else(|| "-".to_string())
}

pub fn immobili<W: Write>(out: &mut W, items: &[ImmobileSummary]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "Nessun immobile.");
    }
    for item in items {
        let city = item.citta.as_deref().unwrap_or("-");
        let status = item.stato.as_deref().unwrap_or("-");
        writeln!(
            out,
            "#{} {} ({city}) | {} | {status}",
            item.id,
            item.indirizzo,
            price(item.prezzo)
        )?;
    }
    Ok(())
}

pub fn users<W: Write>(out: &mut W, users: &[User]) -> io::Result<()> {
    if users.is_empty() {
        return writeln!(out, "Nessun utente registrato.");
    }
    for user in users {
        let role = user
            .role
            .map(|role| format!("{role:?}").to_lowercase())
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "#{} {} <{}> [{role}]", user.id, user.name, user.email)?;
    }
    Ok(())
}

pub fn contracts<W: Write>(out: &mut W, page: &PagedList<ContrattoChiuso>) -> io::Result<()> {
    if page.items.is_empty() {
        writeln!(out, "Nessun contratto chiuso.")?;
    }
    for contract in &page.items {
        let end = contract
            .data_fine
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "in corso".to_string());
        writeln!(
            out,
            "#{} {} | {} -> {end} | {}",
            contract.id,
            contract.indirizzo,
            contract.data_inizio.format("%d/%m/%Y"),
            price(contract.valore)
        )?;
    }
    if page.page.has_more {
        writeln!(
            out,
            "Altri risultati disponibili (--offset {}).",
            page.page.next_offset
        )?;
    }
    Ok(())
}

pub fn valutazioni<W: Write>(out: &mut W, items: &[Valutazione]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "Nessuna valutazione in coda.");
    }
    for item in items {
        writeln!(
            out,
            "#{} {} | stima {} | {}",
            item.id,
            item.indirizzo,
            price(item.prezzo_stimato),
            item.stato.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

pub fn incarichi<W: Write>(out: &mut W, items: &[Incarico]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "Nessun incarico assegnato.");
    }
    for item in items {
        let valuation = item
            .valutazione_id
            .map(|id| format!("valutazione #{id}"))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "#{} {} | {valuation} | {}",
            item.id,
            item.indirizzo,
            item.stato.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stimacasa::session::AccessDenied;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn server_failures_read_as_generic_retry() {
        let err = AppError::Api(ApiError::Status {
            status: 500,
            message: "NullPointerException".to_string(),
        });
        assert_eq!(user_message(&err), GENERIC_FAILURE);
    }

    #[test]
    fn unauthorized_status_reads_as_invalid_credentials() {
        let err = AppError::Api(ApiError::Status {
            status: 403,
            message: "Forbidden".to_string(),
        });
        assert!(user_message(&err).starts_with(INVALID_CREDENTIALS));
    }

    #[test]
    fn denied_route_points_to_login() {
        let err = AppError::Access(AccessDenied {
            required: Role::Admin,
        });
        let message = user_message(&err);
        assert!(message.contains("amministratore"));
        assert!(message.contains(LOGIN_ROUTE));
    }

    #[test]
    fn rejected_submission_shows_backend_reason() {
        let err = SubmitError::Rejected("Zona non coperta".to_string());
        assert_eq!(submit_failure(&err), "Richiesta non accettata: Zona non coperta");
    }

    #[test]
    fn identity_line_names_role() {
        let identity = Identity {
            id: "a.neri".to_string(),
            name: "a.neri".to_string(),
            email: "anna.neri@example.it".to_string(),
            role: Some(Role::Agent),
        };
        assert_eq!(
            render(|out| super::identity(out, Some(&identity))),
            "a.neri <anna.neri@example.it> (agente)\n"
        );
        assert_eq!(
            render(|out| super::identity(out, None)),
            "Nessun utente collegato.\n"
        );
    }

    #[test]
    fn statistics_skip_missing_counters() {
        let stats = DashboardStatistics {
            totale_immobili: Some(12),
            incarichi_attivi: Some(4),
            ..DashboardStatistics::default()
        };
        assert_eq!(
            render(|out| statistics(out, &stats)),
            "Immobili totali: 12\nIncarichi attivi: 4\n"
        );
    }
}
