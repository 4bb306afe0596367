//! The fixed metadata vocabulary.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Headers that every metadata table must have.
pub const REQUIRED_HEADERS: &[&str] = &["dc.title", "dc.date.issued", "dc.type", "dc.subject"];

/// Every header name the repository accepts.
pub const RECOGNIZED_HEADERS: &[&str] = &[
    // Files
    "BUNDLE:ORIGINAL",
    "filename",
    // Dublin Core
    "dc.contributor",
    "dc.contributor.advisor",
    "dc.contributor.author",
    "dc.contributor.committeeChair",
    "dc.contributor.committeeMember",
    "dc.contributor.editor",
    "dc.contributor.illustrator",
    "dc.contributor.other",
    "dc.coverage.spatial",
    "dc.coverage.temporal",
    "dc.creator",
    "dc.date",
    "dc.date.accessioned",
    "dc.date.available",
    "dc.date.copyright",
    "dc.date.created",
    "dc.date.embargo",
    "dc.date.issued",
    "dc.date.submitted",
    "dc.date.updated",
    "dc.description",
    "dc.description.abstract",
    "dc.description.peerReview",
    "dc.description.provenance",
    "dc.description.reason",
    "dc.description.sponsorship",
    "dc.description.statementofresponsibility",
    "dc.description.status",
    "dc.description.tableofcontents",
    "dc.description.terms",
    "dc.description.uri",
    "dc.description.version",
    "dc.format",
    "dc.format.extent",
    "dc.format.medium",
    "dc.format.mimetype",
    "dc.identifier",
    "dc.identifier.bibapp",
    "dc.identifier.bibliographicCitation",
    "dc.identifier.citation",
    "dc.identifier.doi",
    "dc.identifier.govdoc",
    "dc.identifier.isbn",
    "dc.identifier.ismn",
    "dc.identifier.issn",
    "dc.identifier.localBib",
    "dc.identifier.oclc",
    "dc.identifier.other",
    "dc.identifier.sici",
    "dc.identifier.slug",
    "dc.identifier.uri",
    "dc.language",
    "dc.language.iso",
    "dc.language.rfc3066",
    "dc.provenance",
    "dc.publisher",
    "dc.relation",
    "dc.relation.hasPart",
    "dc.relation.haspart",
    "dc.relation.hasversion",
    "dc.relation.isbasedon",
    "dc.relation.isformatof",
    "dc.relation.ispartof",
    "dc.relation.ispartofseries",
    "dc.relation.isreferencedby",
    "dc.relation.isreplacedby",
    "dc.relation.isversionof",
    "dc.relation.replaces",
    "dc.relation.requires",
    "dc.relation.uri",
    "dc.rights",
    "dc.rights.accessRights",
    "dc.rights.holder",
    "dc.rights.license",
    "dc.rights.uri",
    "dc.source",
    "dc.source.uri",
    "dc.subject",
    "dc.subject.classification",
    "dc.subject.ddc",
    "dc.subject.lcc",
    "dc.subject.lcsh",
    "dc.subject.mesh",
    "dc.subject.other",
    "dc.title",
    "dc.title.alternative",
    "dc.type",
    "dc.type.genre",
    "dc.type.material",
    // MODS
    "mods.part.extentEnd",
    "mods.part.extentStart",
    "mods.part.extentTotal",
    "mods.part.typeIssue",
    "mods.part.typeVolume",
    // Thesis
    "thesis.degree.department",
    "thesis.degree.departmentCode",
    "thesis.degree.discipline",
    "thesis.degree.disciplineCode",
    "thesis.degree.grantor",
    "thesis.degree.level",
    "thesis.degree.name",
    "thesis.degree.program",
    "thesis.degree.programCode",
    // OWL
    "owl.sameAs",
    // DCMI Terms
    "dcterms.abstract",
    "dcterms.accessRights",
    "dcterms.accrualMethod",
    "dcterms.accrualPeriodicity",
    "dcterms.accrualPolicy",
    "dcterms.alternative",
    "dcterms.audience",
    "dcterms.available",
    "dcterms.bibliographicCitation",
    "dcterms.conformsTo",
    "dcterms.contributor",
    "dcterms.coverage",
    "dcterms.created",
    "dcterms.creator",
    "dcterms.date",
    "dcterms.dateAccepted",
    "dcterms.dateCopyrighted",
    "dcterms.dateSubmitted",
    "dcterms.description",
    "dcterms.educationLevel",
    "dcterms.extent",
    "dcterms.format",
    "dcterms.hasFormat",
    "dcterms.hasPart",
    "dcterms.hasVersion",
    "dcterms.identifier",
    "dcterms.instructionalMethod",
    "dcterms.isFormatOf",
    "dcterms.isPartOf",
    "dcterms.isReferencedBy",
    "dcterms.isReplacedBy",
    "dcterms.isRequiredBy",
    "dcterms.issued",
    "dcterms.isVersionOf",
    "dcterms.language",
    "dcterms.license",
    "dcterms.mediator",
    "dcterms.medium",
    "dcterms.modified",
    "dcterms.provenance",
    "dcterms.publisher",
    "dcterms.references",
    "dcterms.relation",
    "dcterms.replaces",
    "dcterms.requires",
    "dcterms.rights",
    "dcterms.rightsHolder",
    "dcterms.source",
    "dcterms.spatial",
    "dcterms.subject",
    "dcterms.tableOfContents",
    "dcterms.temporal",
    "dcterms.title",
    "dcterms.type",
    "dcterms.valid",
    // EPerson
    "eperson.firstname",
    "eperson.language",
    "eperson.lastname",
    "eperson.phone",
];

static RECOGNIZED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RECOGNIZED_HEADERS.iter().copied().collect());

/// Returns true if `header` is part of the vocabulary.
pub fn is_recognized(header: &str) -> bool {
    RECOGNIZED.contains(header)
}
