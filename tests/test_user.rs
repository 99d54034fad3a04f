#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Utc};
use jobboard_backend::entities::{
    application::{Experience, NewApplicationRequest},
    company::NewCompanyRequest,
    job::{NewJobRequest, UpdateJobRequest},
    user::{LoginUser, NewUser},
};
use uuid::Uuid;

pub const STRONG_PASSWORD: &str = "Str0ng!Passw0rd#2024";

pub fn valid_seeker(email: &str) -> NewUser {
    NewUser {
        name: "Abebe Kebede".into(),
        email: email.into(),
        password: STRONG_PASSWORD.into(),
        study_area: vec!["Computer Science".into()],
    }
}

pub fn login_for(email: &str) -> LoginUser {
    LoginUser {
        email: email.into(),
        password: STRONG_PASSWORD.into(),
    }
}

pub fn valid_company(name: &str, admin_email: &str) -> NewCompanyRequest {
    NewCompanyRequest {
        name: name.into(),
        admin_name: "Hana Tesfaye".into(),
        admin_email: admin_email.into(),
        password: STRONG_PASSWORD.into(),
        address: "Bole Road, Addis Ababa".into(),
        logo: Some("https://blobs.test/ipfs/logo".into()),
        license_url: Some("https://blobs.test/ipfs/license".into()),
    }
}

pub fn future_deadline() -> String {
    (Utc::now().date_naive() + Duration::days(30)).format("%Y-%m-%d").to_string()
}

pub fn valid_job(title: &str) -> NewJobRequest {
    NewJobRequest {
        title: title.into(),
        area: "Engineering".into(),
        location: "Addis Ababa".into(),
        deadline: future_deadline(),
        site: "Full_time".into(),
        about_job: "Build and operate backend services.".into(),
        qualifications: vec!["BSc in Computer Science".into()],
        responsibilities: vec!["Design APIs".into(), "Review code".into()],
        required_skills: vec!["Rust".into(), "PostgreSQL".into()],
        status: None,
    }
}

pub fn job_update(company_id: Uuid, title: &str, status: &str) -> UpdateJobRequest {
    UpdateJobRequest {
        title: title.into(),
        company_id,
        area: "Engineering".into(),
        location: "Remote".into(),
        deadline: future_deadline(),
        site: "Part_time".into(),
        about_job: "Maintain backend services.".into(),
        status: status.into(),
        qualifications: vec!["MSc".into()],
        responsibilities: vec!["Own the job board".into()],
        required_skills: vec!["Rust".into()],
    }
}

pub fn valid_application(job_id: Uuid) -> NewApplicationRequest {
    NewApplicationRequest {
        job_id,
        full_name: "Abebe Kebede".into(),
        email: "abebe@example.com".into(),
        year_of_birth: Utc::now().year() - 28,
        address: "Bole, Addis Ababa".into(),
        phone: "+251911234567".into(),
        portfolio: Some("https://abebe.dev".into()),
        profession: "Software Engineer".into(),
        career_level: "Mid".into(),
        cover_letter: "I have shipped backend systems for five years and would love to join.".into(),
        experiences: vec![Experience {
            job_title: "Backend Developer".into(),
            company_name: "Acme".into(),
            location: "Addis Ababa".into(),
            responsibilities: "Built payment services".into(),
        }],
        degree_type: "BSc".into(),
        institution: "Addis Ababa University".into(),
        graduation_date: NaiveDate::from_ymd_opt(2018, 7, 1).expect("valid date"),
        skills: vec!["Rust".into(), "SQL".into()],
        certifications: vec![],
        languages: vec!["Amharic".into(), "English".into()],
        projects: None,
        volunteer_work: None,
        resume_url: None,
    }
}
