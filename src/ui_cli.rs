use std::io::{self, Write};

use crate::app::AppError;
use crate::config::Config;
use crate::i18n::{keys, Language, Translator};
use crate::profile::SYMPTOM_SLOTS;
use crate::session::{self, Session};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Predict,
    ChangeLanguage,
    Exit,
}

/// 제목/안내문과(있다면) 로드 오류를 출력한다.
pub fn print_header(session: &Session) {
    let tr = session.labels();
    println!("\n{}", tr.t(keys::MENU_TITLE));
    println!("{}", tr.t(keys::APP_DESCRIPTION));
    if let Some(err) = session.load_error() {
        println!("{}: {}", tr.t(keys::ERROR_PREFIX), session::describe_load_error(err, tr));
        println!("{}", tr.t(keys::ERROR_RESOURCES_UNAVAILABLE));
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MENU_PREDICT));
    println!("{}", tr.t(keys::MENU_CHANGE_LANGUAGE));
    println!("{}", tr.t(keys::MENU_EXIT));
    loop {
        let sel = read_line(&tr.t(keys::MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Predict),
            "2" => return Ok(MenuChoice::ChangeLanguage),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 증상 네 개를 번호로 고르게 한 뒤 예측 결과를 출력한다.
pub fn handle_predict(session: &mut Session) -> Result<(), AppError> {
    let tr = session.labels().clone();
    if session.load_error().is_some() {
        println!("{}", tr.t(keys::ERROR_RESOURCES_UNAVAILABLE));
        return Ok(());
    }
    println!("\n-- {} --", tr.t(keys::FORM_SELECT_SYMPTOMS));
    for slot in 0..SYMPTOM_SLOTS {
        let options = session.symptom_options(slot).to_vec();
        println!("{}", tr.t(keys::SYMPTOM_LABELS[slot]));
        for (i, opt) in options.iter().enumerate() {
            println!("{:>3}) {opt}", i + 1);
        }
        let idx = read_index(&tr, options.len())?;
        session.set_selection(slot, options[idx].clone())?;
    }
    let result = session.submit()?;
    println!();
    for line in result.render_lines(&tr) {
        println!("{line}");
    }
    Ok(())
}

/// 언어를 바꾸고 설정에도 기록한다.
pub fn handle_change_language(session: &mut Session, cfg: &mut Config) -> Result<(), AppError> {
    let tr = session.labels().clone();
    println!("\n-- {} --", tr.t(keys::APP_SELECT_LANGUAGE));
    let languages = session.languages();
    for (i, lang) in languages.iter().enumerate() {
        println!("{}) {lang}", i + 1);
    }
    let idx = read_index(&tr, languages.len())?;
    let lang: Language = languages[idx];
    session.select_language(lang);
    cfg.language = lang.as_code().to_string();
    print_header(session);
    Ok(())
}

/// "1".."len" 입력을 0 기반 인덱스로 바꾼다.
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    let n = input.trim().parse::<usize>().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

fn read_index(tr: &Translator, len: usize) -> Result<usize, AppError> {
    if len == 0 {
        return Err(AppError::Session(session::SessionError::Unavailable));
    }
    loop {
        let s = read_line(&tr.t(keys::MENU_SYMPTOM_PROMPT))?;
        match parse_choice(&s, len) {
            Some(i) => return Ok(i),
            None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(AppError::InputClosed);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_is_one_based_and_bounded() {
        assert_eq!(parse_choice("1", 3), Some(0));
        assert_eq!(parse_choice(" 3\n", 3), Some(2));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("abc", 3), None);
    }
}
