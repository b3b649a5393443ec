//! Builders for Latin-1 statement exports used across test modules.

fn latin1(s: &str) -> Vec<u8> {
    s.chars().map(|c| u8::try_from(u32::from(c)).unwrap()).collect()
}

fn field(s: &str) -> Vec<u8> {
    if s.contains(';') || s.contains('"') {
        let mut out = vec![b'"'];
        out.extend(latin1(&s.replace('"', "\"\"")));
        out.push(b'"');
        out
    } else {
        latin1(s)
    }
}

fn line(fields: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, f) in fields.iter().enumerate() {
        if i > 0 {
            out.push(b';');
        }
        out.extend(field(f));
    }
    out.push(b'\n');
    out
}

/// One 18-column transaction row. `debit` goes to the Soll column, `credit`
/// to Haben.
#[allow(clippy::too_many_arguments)]
pub fn statement_row(
    booking: &str,
    value: &str,
    kind: &str,
    name: &str,
    memo: &str,
    iban: &str,
    bic: &str,
    debit: &str,
    credit: &str,
) -> Vec<u8> {
    line(&[
        booking, value, kind, name, memo, iban, bic, "", "", "", "", "", "", "", "", debit, credit,
        "EUR",
    ])
}

/// Ten rows: two header lines, seven SEPA transactions (four credits) and a
/// closing balance line.
pub fn statement_bytes() -> Vec<u8> {
    let mut out = line(&["Umsätze Girokonto", "Zeitraum: 01.01.2020 - 31.01.2020"]);
    out.extend(line(&[
        "Buchungstag",
        "Wert",
        "Umsatzart",
        "Begünstigter / Auftraggeber",
        "Verwendungszweck",
        "IBAN",
        "BIC",
        "Kundenreferenz",
        "Mandatsreferenz",
        "Gläubiger ID",
        "Fremde Gebühren",
        "Betrag",
        "Abweichender Empfänger",
        "Anzahl der Aufträge",
        "Anzahl der Schecks",
        "Soll",
        "Haben",
        "Währung",
    ]));
    out.extend(statement_row(
        "02.01.2020",
        "03.01.2020",
        "SEPA-Überweisung von",
        "Jörg Müller",
        "Mitgliedsbeitrag Januar",
        "DE89370400440532013000",
        "COBADEFFXXX",
        "",
        "25,00",
    ));
    out.extend(statement_row(
        "05.01.2020",
        "05.01.2020",
        "SEPA-Lastschrift",
        "Stadtwerke",
        "Abschlag Strom",
        "DE12500105170648489890",
        "INGDDEFFXXX",
        "-1.234,56",
        "",
    ));
    out.extend(statement_row(
        "07.01.2020",
        "07.01.2020",
        "SEPA-Überweisung von",
        "Erika Mustermann",
        "Beitrag; Q1 2020",
        "DE02120300000000202051",
        "BYLADEM1001",
        "",
        "60,00",
    ));
    out.extend(statement_row(
        "10.01.2020",
        "10.01.2020",
        "SEPA-Überweisung an",
        "Hackerspace e.V.",
        "Raummiete",
        "DE75512108001245126199",
        "SOGEDEFFXXX",
        "-50,00",
        "",
    ));
    out.extend(statement_row(
        "14.01.2020",
        "14.01.2020",
        "SEPA-Gutschrift",
        "Max Mustermann",
        "Spende",
        "DE02500105170137075030",
        "INGDDEFFXXX",
        "",
        "1.000,00",
    ));
    out.extend(statement_row(
        "20.01.2020",
        "20.01.2020",
        "SEPA-Lastschrift",
        "Telekom",
        "Internet",
        "DE02300209000106531065",
        "CMCIDEDDXXX",
        "-39,95",
        "",
    ));
    out.extend(statement_row(
        "28.01.2020",
        "28.01.2020",
        "SEPA-Überweisung von",
        "Jörg Müller",
        "Mitgliedsbeitrag Februar",
        "DE89370400440532013000",
        "COBADEFFXXX",
        "",
        "25,00",
    ));
    out.extend(line(&["Kontostand", "31.01.2020", "", "", "1.234,56", "EUR"]));
    out
}
