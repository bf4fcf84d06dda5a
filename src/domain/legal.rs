//! Static policy pages.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalDocument {
    Privacy,
    Terms,
    Refund,
}

pub struct LegalSection {
    pub heading: &'static str,
    pub paragraphs: &'static [&'static str],
}

impl LegalDocument {
    pub fn path(self) -> &'static str {
        match self {
            LegalDocument::Privacy => "/privacy",
            LegalDocument::Terms => "/terms",
            LegalDocument::Refund => "/refund",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            LegalDocument::Privacy => "Privacy Policy",
            LegalDocument::Terms => "Terms of Service",
            LegalDocument::Refund => "Refund Policy",
        }
    }

    pub fn sections(self) -> &'static [LegalSection] {
        match self {
            LegalDocument::Privacy => PRIVACY,
            LegalDocument::Terms => TERMS,
            LegalDocument::Refund => REFUND,
        }
    }
}

static PRIVACY: &[LegalSection] = &[
    LegalSection {
        heading: "Information we collect",
        paragraphs: &[
            "We collect the details you choose to share through our contact and enquiry forms, such as your name, email address and a description of your project.",
            "Our servers keep standard request logs (IP address, user agent, requested path) for up to thirty days to diagnose faults.",
        ],
    },
    LegalSection {
        heading: "How we use it",
        paragraphs: &[
            "Enquiry details are used only to respond to you and to prepare proposals. We do not sell or rent personal information.",
        ],
    },
    LegalSection {
        heading: "Your rights",
        paragraphs: &[
            "You may ask us to access, correct or delete the personal information we hold about you by writing to privacy@showcase.example.com.",
        ],
    },
];

static TERMS: &[LegalSection] = &[
    LegalSection {
        heading: "Use of this site",
        paragraphs: &[
            "Content on this site is provided for general information about our services and may change without notice.",
        ],
    },
    LegalSection {
        heading: "Engagements",
        paragraphs: &[
            "Every engagement is governed by a separate statement of work. Where that statement conflicts with these terms, the statement of work prevails.",
        ],
    },
    LegalSection {
        heading: "Liability",
        paragraphs: &[
            "To the extent permitted by law we are not liable for indirect or consequential loss arising from use of this site.",
        ],
    },
];

static REFUND: &[LegalSection] = &[
    LegalSection {
        heading: "Discovery workshops",
        paragraphs: &[
            "Workshop fees are refundable in full when cancelled at least seven days before the scheduled date.",
        ],
    },
    LegalSection {
        heading: "Project milestones",
        paragraphs: &[
            "Milestone payments are refundable for work that has not started. Delivered milestones are not refundable once accepted.",
            "Refunds are issued to the original payment method within fourteen days of approval.",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_document_has_content() {
        for document in [LegalDocument::Privacy, LegalDocument::Terms, LegalDocument::Refund] {
            assert!(!document.sections().is_empty(), "{}", document.title());
            assert!(document.path().starts_with('/'));
        }
    }
}
