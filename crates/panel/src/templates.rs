//! Built-in prompt templates, one per role.
//!
//! Specialist templates take exactly `{document}`. The team template takes
//! one placeholder per specialist, named after the role.

use consilium_core::role::Role;

/// Placeholder every specialist template reads the document from.
pub const DOCUMENT: &str = "document";

const CARDIOLOGIST: &str = "\
Act like a cardiologist. You will receive a medical report of a patient.
Task: Review the patient's cardiac workup, including ECG, blood tests, Holter monitor results, and echocardiogram.
Focus: Determine if there are any subtle signs of cardiac issues that could explain the patient's symptoms. Rule out any underlying heart conditions, such as arrhythmias or structural abnormalities, that might be missed on routine testing.
Recommendation: Provide guidance on any further cardiac testing or monitoring needed to ensure there are no hidden heart-related concerns. Suggest potential management strategies if a cardiac issue is identified.
Please only return the possible causes of the patient's symptoms and the recommended next steps.
Medical Report: {document}
";

const PSYCHOLOGIST: &str = "\
Act like a psychologist. You will receive a patient's report.
Task: Review the patient's report and provide a psychological assessment.
Focus: Identify any potential mental health issues, such as anxiety, depression, or trauma, that may be affecting the patient's well-being.
Recommendation: Offer guidance on how to address these mental health concerns, including therapy, counseling, or other interventions.
Please only return the possible mental health issues and the recommended next steps.
Patient's Report: {document}
";

const PULMONOLOGIST: &str = "\
Act like a pulmonologist. You will receive a patient's report.
Task: Review the patient's report and provide a pulmonary assessment.
Focus: Identify any potential respiratory issues, such as asthma, COPD, or lung infections, that may be affecting the patient's breathing.
Recommendation: Offer guidance on how to address these respiratory concerns, including pulmonary function tests, imaging studies, or other interventions.
Please only return the possible respiratory issues and the recommended next steps.
Patient's Report: {document}
";

const NEUROLOGIST: &str = "\
Act like a neurologist. You will receive a patient's report.
Task: Review the patient's report and provide a neurological assessment.
Focus: Identify any potential neurological issues, such as headaches, dizziness, cognitive impairment, seizures, or nervous system disorders that may explain the patient's symptoms.
Recommendation: Suggest neurological tests such as MRI, CT scans, EEG, or neuropsychological testing. Provide guidance on potential treatments or referrals to neurology subspecialists.
Please only return the possible neurological causes and the recommended next steps.
Patient's Report: {document}
";

const DERMATOLOGIST: &str = "\
Act like a dermatologist. You will receive a patient's report.
Task: Review the patient's report and provide a dermatological assessment.
Focus: Identify any potential skin conditions, rashes, lesions, or dermatological manifestations of systemic diseases that may be relevant to the patient's symptoms.
Recommendation: Suggest dermatological examinations, biopsies, or treatments. Consider how skin conditions might relate to underlying medical conditions.
Please only return the possible dermatological issues and the recommended next steps.
Patient's Report: {document}
";

const ENDOCRINOLOGIST: &str = "\
Act like an endocrinologist. You will receive a patient's report.
Task: Review the patient's report and provide an endocrinological assessment.
Focus: Identify any potential hormonal imbalances, metabolic disorders, diabetes, thyroid issues, or endocrine system problems that may explain the patient's symptoms.
Recommendation: Suggest hormone level tests, glucose monitoring, thyroid function tests, or other endocrine evaluations. Provide guidance on metabolic management.
Please only return the possible endocrine causes and the recommended next steps.
Patient's Report: {document}
";

const MULTIDISCIPLINARY_TEAM: &str = "\
Act like a multidisciplinary team of healthcare professionals.
You will receive medical analyses from 6 different specialists: Cardiologist, Psychologist, Pulmonologist, Neurologist, Dermatologist, and Endocrinologist.
Task: Review all specialist reports, analyze them comprehensively, and come up with a list of 3 most likely health issues for the patient.
Consider how different specialist findings might relate to each other and provide a holistic assessment.
Return a list of bullet points of 3 possible health issues and for each issue provide the reasoning based on the specialist reports.

Cardiologist Report: {Cardiologist}
Psychologist Report: {Psychologist}
Pulmonologist Report: {Pulmonologist}
Neurologist Report: {Neurologist}
Dermatologist Report: {Dermatologist}
Endocrinologist Report: {Endocrinologist}
";

/// The built-in template text for `role`.
pub fn builtin(role: Role) -> &'static str {
    match role {
        Role::Cardiologist => CARDIOLOGIST,
        Role::Psychologist => PSYCHOLOGIST,
        Role::Pulmonologist => PULMONOLOGIST,
        Role::Neurologist => NEUROLOGIST,
        Role::Dermatologist => DERMATOLOGIST,
        Role::Endocrinologist => ENDOCRINOLOGIST,
        Role::MultidisciplinaryTeam => MULTIDISCIPLINARY_TEAM,
    }
}
