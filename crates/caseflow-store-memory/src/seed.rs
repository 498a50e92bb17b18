//! Demo records for running the portal without any real submissions.
//!
//! Dates are relative to the moment the store is built so the dashboard
//! always shows a mix of upcoming, due-soon and overdue deadlines.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use caseflow_core::{
  acknowledgment::{AgencyType, EthicsAcknowledgment},
  case::{Case, CaseStatus, CaseType, Priority, StaffRef},
  opinion::PublishedOpinion,
  record::CaseActivity,
};

use crate::store::{Inner, MemoryStore};

struct Party {
  name:   &'static str,
  title:  &'static str,
  agency: &'static str,
  email:  &'static str,
}

const NOBODY: Party = Party { name: "", title: "", agency: "", email: "" };

struct DemoCase {
  number:      &'static str,
  case_type:   CaseType,
  status:      CaseStatus,
  submitter:   Party,
  subject:     Party,
  summary:     &'static str,
  description: &'static str,
  age_days:    i64,
  due_in_days: Option<i64>,
  assigned:    bool,
  priority:    Priority,
}

impl DemoCase {
  fn build(self, now: DateTime<Utc>) -> Case {
    let submitted_at = now - Duration::days(self.age_days);
    let closed = self.status == CaseStatus::Closed;
    Case {
      id: Uuid::new_v4(),
      case_number: self.number.to_owned(),
      case_type: self.case_type,
      status: self.status,
      submitter_name: self.submitter.name.to_owned(),
      submitter_title: self.submitter.title.to_owned(),
      submitter_agency: self.submitter.agency.to_owned(),
      submitter_email: self.submitter.email.to_owned(),
      submitter_phone: String::new(),
      subject_name: self.subject.name.to_owned(),
      subject_title: self.subject.title.to_owned(),
      subject_agency: self.subject.agency.to_owned(),
      summary: self.summary.to_owned(),
      description: self.description.to_owned(),
      statute_citations: String::new(),
      submitted_at,
      due_date: self.due_in_days.map(|d| now + Duration::days(d)),
      closed_at: closed.then_some(now),
      published_at: None,
      assigned_to: self.assigned.then(|| StaffRef {
        id:   "user_1".to_owned(),
        name: "Ross Armstrong".to_owned(),
      }),
      priority: self.priority,
      is_public: false,
      is_confidential: false,
      tags: Vec::new(),
      created_at: submitted_at,
      updated_at: submitted_at,
      version: 0,
    }
  }
}

fn demo_cases() -> Vec<DemoCase> {
  use CaseStatus::*;
  use CaseType::*;

  vec![
    DemoCase {
      number:      "AO-2024-042",
      case_type:   AdvisoryOpinion,
      status:      Submitted,
      submitter:   Party {
        name:   "John Smith",
        title:  "City Manager",
        agency: "City of Henderson",
        email:  "jsmith@henderson.gov",
      },
      subject:     NOBODY,
      summary:     "Question regarding contractor relationships",
      description: "May I participate in discussions regarding a contract with a company \
                    where my brother-in-law is employed?",
      age_days:    1,
      due_in_days: Some(3),
      assigned:    true,
      priority:    Priority::Normal,
    },
    DemoCase {
      number:      "EC-2024-018",
      case_type:   EthicsComplaint,
      status:      UnderReview,
      submitter:   Party {
        name:   "Jane Doe",
        title:  "",
        agency: "",
        email:  "concerned@example.com",
      },
      subject:     Party {
        name:   "Robert Johnson",
        title:  "County Commissioner",
        agency: "Clark County",
        email:  "",
      },
      summary:     "Alleged gift violation",
      description: "Commissioner Johnson allegedly accepted tickets to a Las Vegas show \
                    from a vendor seeking county contracts.",
      age_days:    2,
      due_in_days: Some(5),
      assigned:    true,
      priority:    Priority::High,
    },
    DemoCase {
      number:      "PRR-2024-089",
      case_type:   PublicRecordsRequest,
      status:      Submitted,
      submitter:   Party {
        name:   "City of Henderson",
        title:  "",
        agency: "",
        email:  "records@cityofhenderson.com",
      },
      subject:     NOBODY,
      summary:     "Request for ethics training records",
      description: "Requesting copies of all ethics training materials and attendance \
                    records from 2023-2024.",
      age_days:    3,
      due_in_days: Some(2),
      assigned:    false,
      priority:    Priority::Normal,
    },
    DemoCase {
      number:      "AO-2024-041",
      case_type:   AdvisoryOpinion,
      status:      Investigation,
      submitter:   Party {
        name:   "Maria Garcia",
        title:  "State Employee",
        agency: "Department of Motor Vehicles",
        email:  "mgarcia@dmv.nv.gov",
      },
      subject:     NOBODY,
      summary:     "Outside employment with DMV vendor",
      description: "I have been offered a weekend consulting position with an IT firm \
                    that has contracts with DMV. Is this permissible?",
      age_days:    5,
      due_in_days: Some(40),
      assigned:    true,
      priority:    Priority::Normal,
    },
    DemoCase {
      number:      "PRR-2024-088",
      case_type:   PublicRecordsRequest,
      status:      UnderReview,
      submitter:   Party {
        name:   "Nevada Press Association",
        title:  "",
        agency: "",
        email:  "records@nvpress.org",
      },
      subject:     NOBODY,
      summary:     "Request for complaint statistics",
      description: "Requesting all complaint statistics from 2020-2024.",
      age_days:    7,
      due_in_days: Some(-2),
      assigned:    true,
      priority:    Priority::High,
    },
    DemoCase {
      number:      "AO-2024-039",
      case_type:   AdvisoryOpinion,
      status:      UnderReview,
      submitter:   Party {
        name:   "David Chen",
        title:  "Director",
        agency: "Department of Transportation",
        email:  "dchen@dot.nv.gov",
      },
      subject:     NOBODY,
      summary:     "Family member employment at vendor",
      description: "My daughter has been offered employment at a firm that frequently \
                    bids on NDOT contracts. What are my obligations?",
      age_days:    14,
      due_in_days: Some(7),
      assigned:    true,
      priority:    Priority::Normal,
    },
    DemoCase {
      number:      "EC-2024-017",
      case_type:   EthicsComplaint,
      status:      DraftPrepared,
      submitter:   Party {
        name:   "Anonymous",
        title:  "",
        agency: "",
        email:  "anonymous@protonmail.com",
      },
      subject:     Party {
        name:   "Lisa Wong",
        title:  "City Councilwoman",
        agency: "City of Reno",
        email:  "",
      },
      summary:     "Misuse of public resources",
      description: "Councilwoman Wong allegedly used city staff to plan her daughter's \
                    wedding.",
      age_days:    21,
      due_in_days: Some(14),
      assigned:    true,
      priority:    Priority::High,
    },
    DemoCase {
      number:      "AO-2024-040",
      case_type:   AdvisoryOpinion,
      status:      Closed,
      submitter:   Party {
        name:   "Thomas Anderson",
        title:  "Sheriff",
        agency: "Washoe County Sheriff's Office",
        email:  "tanderson@washoesheriff.gov",
      },
      subject:     NOBODY,
      summary:     "Charitable organization board membership",
      description: "May I serve on the board of a charitable organization that \
                    occasionally applies for county grants?",
      age_days:    30,
      due_in_days: Some(-15),
      assigned:    true,
      priority:    Priority::Normal,
    },
  ]
}

/// Each acknowledgment with the status of the EA case it was filed under.
fn demo_acknowledgments(now: DateTime<Utc>) -> Vec<(EthicsAcknowledgment, CaseStatus)> {
  let today = now.date_naive();
  let ack = |number: &str,
             name: &str,
             title: &str,
             agency: &str,
             agency_type: AgencyType,
             term_years: i64,
             term_end_days: Option<i64>,
             filed_days_ago: i64,
             email: &str,
             status: CaseStatus| {
    let acknowledged_at = now - Duration::days(filed_days_ago);
    let ack = EthicsAcknowledgment {
      id: Uuid::new_v4(),
      case_number: number.to_owned(),
      case_id: None,
      official_name: name.to_owned(),
      official_title: title.to_owned(),
      agency: agency.to_owned(),
      agency_type,
      term_start: today - Duration::days(365 * term_years),
      term_end: term_end_days.map(|d| today + Duration::days(d)),
      acknowledged_at,
      signature_on_file: true,
      email: email.to_owned(),
      phone: String::new(),
      address: String::new(),
      is_active: true,
      created_at: acknowledged_at,
      updated_at: acknowledged_at,
    };
    (ack, status)
  };

  vec![
    ack(
      "EA-2024-089",
      "Maria Garcia",
      "Board Member",
      "Nevada State Board of Education",
      AgencyType::State,
      1,
      Some(730),
      4,
      "mgarcia@doe.nv.gov",
      CaseStatus::UnderReview,
    ),
    ack(
      "EA-2024-088",
      "James Wilson",
      "County Commissioner",
      "Clark County",
      AgencyType::County,
      2,
      Some(548),
      6,
      "jwilson@clarkcounty.gov",
      CaseStatus::Closed,
    ),
    ack(
      "EA-2024-087",
      "Patricia Chen",
      "City Councilwoman",
      "City of Las Vegas",
      AgencyType::City,
      1,
      None,
      10,
      "pchen@lasvegasnevada.gov",
      CaseStatus::Closed,
    ),
    ack(
      "EA-2024-086",
      "Robert Thompson",
      "Board Trustee",
      "Las Vegas Valley Water District",
      AgencyType::District,
      3,
      None,
      15,
      "rthompson@lvvwd.com",
      CaseStatus::Closed,
    ),
    ack(
      "EA-2024-085",
      "Sarah Martinez",
      "Director",
      "Nevada Department of Motor Vehicles",
      AgencyType::State,
      1,
      None,
      20,
      "smartinez@dmv.nv.gov",
      CaseStatus::Closed,
    ),
  ]
}

/// The EA case `ack` was filed under.
fn acknowledgment_case(ack: &EthicsAcknowledgment, status: CaseStatus) -> Case {
  Case {
    id: Uuid::new_v4(),
    case_number: ack.case_number.clone(),
    case_type: CaseType::EthicsAcknowledgment,
    status,
    submitter_name: ack.official_name.clone(),
    submitter_title: ack.official_title.clone(),
    submitter_agency: ack.agency.clone(),
    submitter_email: ack.email.clone(),
    submitter_phone: ack.phone.clone(),
    subject_name: String::new(),
    subject_title: String::new(),
    subject_agency: String::new(),
    summary: "Annual Ethics Acknowledgment".to_owned(),
    description: String::new(),
    statute_citations: String::new(),
    submitted_at: ack.acknowledged_at,
    due_date: None,
    closed_at: (status == CaseStatus::Closed).then_some(ack.acknowledged_at),
    published_at: None,
    assigned_to: None,
    priority: Priority::Normal,
    is_public: false,
    is_confidential: false,
    tags: Vec::new(),
    created_at: ack.acknowledged_at,
    updated_at: ack.acknowledged_at,
    version: 0,
  }
}

fn demo_opinions(now: DateTime<Utc>) -> Vec<PublishedOpinion> {
  vec![
    PublishedOpinion {
      case_number:  "AO-2024-010".to_owned(),
      case_type:    CaseType::AdvisoryOpinion,
      title:        "Advisory Opinion: Contractor Relationships".to_owned(),
      summary:      "A public officer may not use their position to secure unwarranted \
                     privileges for a family member's business."
        .to_owned(),
      topics:       vec!["Conflicts of Interest".to_owned(), "Family Members".to_owned()],
      statutes:     vec!["NRS 281A.400".to_owned()],
      document_url: None,
      published_at: now - Duration::days(30),
      year:         2024,
    },
    PublishedOpinion {
      case_number:  "EC-2024-005".to_owned(),
      case_type:    CaseType::EthicsComplaint,
      title:        "Final Order: Gift Violations".to_owned(),
      summary:      "The Commission finds a willful violation of the Ethics in Government \
                     Law occurred when the subject accepted gifts exceeding $50."
        .to_owned(),
      topics:       vec!["Gifts".to_owned(), "NRS 281A.400".to_owned()],
      statutes:     vec!["NRS 281A.400".to_owned(), "NRS 281A.480".to_owned()],
      document_url: None,
      published_at: now - Duration::days(60),
      year:         2024,
    },
  ]
}

impl MemoryStore {
  /// A store pre-populated with demo cases, acknowledgments and published
  /// opinions. Every acknowledgment is linked to its EA case. Counters
  /// continue after the highest seeded number of each type.
  pub fn with_demo_data() -> Self {
    let now = Utc::now();
    let mut inner = Inner::default();

    for demo in demo_cases() {
      seed_case(&mut inner, demo.build(now));
    }
    for (mut ack, status) in demo_acknowledgments(now) {
      let case = acknowledgment_case(&ack, status);
      ack.case_id = Some(case.id);
      seed_case(&mut inner, case);
      inner.acknowledgments.insert(ack.id, ack);
    }
    for opinion in demo_opinions(now) {
      inner.opinions.insert(opinion.case_number.clone(), opinion);
    }

    inner.counters.extend([
      (CaseType::AdvisoryOpinion, 42),
      (CaseType::EthicsComplaint, 18),
      (CaseType::EthicsAcknowledgment, 89),
      (CaseType::PublicRecordsRequest, 89),
    ]);

    Self::from_inner(inner)
  }
}

fn seed_case(inner: &mut Inner, case: Case) {
  inner.activity.push(CaseActivity::created(&case));
  inner.cases.insert(case.id, case);
}
