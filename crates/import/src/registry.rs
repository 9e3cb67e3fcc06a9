use tabula_core::{BankFormatDescriptor, FormatSummary, LogicalField};

use LogicalField::{Amount, Category, Date, Iban, Notes, Payee};

/// Known bank export formats, in detection priority order.
pub static REGISTRY: &[BankFormatDescriptor] = &[
    BankFormatDescriptor {
        id: "dkb",
        name: "DKB",
        encoding: "iso-8859-1",
        delimiter: ';',
        skip_rows: 4,
        columns: &[
            (Date, "Buchungstag"),
            (Payee, "Auftraggeber / Begünstigter"),
            (Amount, "Betrag (EUR)"),
            (Iban, "Kontonummer"),
            (Notes, "Verwendungszweck"),
        ],
        date_format: "%d.%m.%Y",
        spreadsheet_only: false,
    },
    BankFormatDescriptor {
        id: "sparkasse",
        name: "Sparkasse (CSV-CAMT)",
        encoding: "iso-8859-1",
        delimiter: ';',
        skip_rows: 0,
        columns: &[
            (Date, "Buchungstag"),
            (Payee, "Beguenstigter/Zahlungspflichtiger"),
            (Amount, "Betrag"),
            (Iban, "Kontonummer/IBAN"),
            (Notes, "Verwendungszweck"),
        ],
        date_format: "%d.%m.%y",
        spreadsheet_only: false,
    },
    BankFormatDescriptor {
        id: "ing",
        name: "ING",
        encoding: "iso-8859-1",
        delimiter: ';',
        skip_rows: 13,
        columns: &[
            (Date, "Buchung"),
            (Payee, "Auftraggeber/Empfänger"),
            (Amount, "Betrag"),
            (Notes, "Verwendungszweck"),
        ],
        date_format: "%d.%m.%Y",
        spreadsheet_only: false,
    },
    BankFormatDescriptor {
        id: "commerzbank",
        name: "Commerzbank",
        encoding: "utf-8",
        delimiter: ';',
        skip_rows: 0,
        columns: &[
            (Date, "Buchungstag"),
            (Payee, "Buchungstext"),
            (Amount, "Betrag"),
            (Iban, "IBAN Auftraggeberkonto"),
            (Notes, "Umsatzart"),
            (Category, "Kategorie"),
        ],
        date_format: "%d.%m.%Y",
        spreadsheet_only: false,
    },
    BankFormatDescriptor {
        id: "deutsche_bank",
        name: "Deutsche Bank",
        encoding: "iso-8859-1",
        delimiter: ';',
        skip_rows: 4,
        columns: &[
            (Date, "Buchungstag"),
            (Payee, "Begünstigter / Auftraggeber"),
            (Amount, "Betrag"),
            (Iban, "IBAN"),
            (Notes, "Verwendungszweck"),
        ],
        date_format: "%d.%m.%Y",
        spreadsheet_only: false,
    },
    BankFormatDescriptor {
        id: "n26",
        name: "N26",
        encoding: "utf-8",
        delimiter: ',',
        skip_rows: 0,
        columns: &[
            (Date, "Booking Date"),
            (Payee, "Partner Name"),
            (Amount, "Amount (EUR)"),
            (Iban, "Partner Iban"),
            (Notes, "Payment Reference"),
        ],
        date_format: "%Y-%m-%d",
        spreadsheet_only: false,
    },
    BankFormatDescriptor {
        id: "finanzguru_xlsx",
        name: "Finanzguru (XLSX)",
        encoding: "utf-8",
        delimiter: ',',
        skip_rows: 0,
        columns: &[
            (Date, "Buchungsdatum"),
            (Payee, "Beguenstigter/Auftraggeber"),
            (Amount, "Betrag"),
            (Iban, "IBAN Auftragskonto"),
            (Notes, "Verwendungszweck"),
            (Category, "Analyse-Hauptkategorie"),
        ],
        date_format: "%d.%m.%Y",
        spreadsheet_only: true,
    },
];

/// Exact lookup by format id.
pub fn find(id: &str) -> Option<&'static BankFormatDescriptor> {
    REGISTRY.iter().find(|d| d.id == id)
}

/// Registry contents for display; never consulted for parsing decisions.
pub fn list_formats() -> Vec<FormatSummary> {
    REGISTRY.iter().map(BankFormatDescriptor::summary).collect()
}
