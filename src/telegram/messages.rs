//! User-facing message templates.
//!
//! All texts are Ukrainian. Dynamic pieces (name, profession, deadline)
//! are formatted here so flows never concatenate strings themselves.

use chrono::{DateTime, Utc};
use indoc::{formatdoc, indoc};

use crate::core::config;
use crate::core::types::Profession;
use crate::tasks::TaskCatalog;

pub const WELCOME: &str = indoc! {"
    Привіт! 👋

    Я бот школи SkillKlan. Допоможу тобі спробувати себе в IT:
    обери напрям, отримай тестове завдання і поверни його нам на перевірку.

    З чого почнемо? Обери напрям, який тебе цікавить:
"};

pub const CHOOSE_PROFESSION: &str = "Обери напрям, який тебе цікавить:";

pub fn profession_chosen(profession: Profession) -> String {
    let details = match profession {
        Profession::Qa => indoc! {"
            Чудовий вибір! 🔍

            QA-інженер перевіряє якість продукту: шукає баги, пише тест-кейси
            і стежить, щоб користувачі отримали робочий застосунок.
        "},
        Profession::Ba => indoc! {"
            Чудовий вибір! 📊

            Бізнес-аналітик з'єднує замовника і команду розробки: збирає вимоги,
            описує процеси і допомагає будувати продукт, який справді потрібен.
        "},
    };
    format!(
        "{}\nГотовий спробувати себе в ролі {}?",
        details,
        profession.title()
    )
}

pub const CONTACT_REQUEST: &str = indoc! {"
    Супер! 🎯

    Щоб надіслати тобі тестове завдання, мені потрібен твій номер телефону.
    Натисни кнопку нижче, щоб поділитися контактом.
"};

pub const CONTACT_REPEAT: &str = indoc! {"
    Будь ласка, скористайся кнопкою «Поділитися контактом» нижче,
    щоб я міг зберегти твій номер телефону.
"};

pub fn contact_saved(first_name: &str) -> String {
    format!("Дякую, {}! Твій контакт збережено. 📱", first_name)
}

pub fn task_caption(profession: Profession, deadline: DateTime<Utc>) -> String {
    let info = TaskCatalog::info_for(profession);
    formatdoc! {"
        {title} 📄

        {description}

        На виконання маєш {days} робочих днів, дедлайн: {deadline}.
        Коли завершиш, натисни кнопку «Здати завдання».
        ",
        title = info.title,
        description = info.description,
        days = config::tasks::DEADLINE_WORKING_DAYS,
        deadline = format_deadline(deadline),
    }
}

pub const TASK_FILE_MISSING: &str = indoc! {"
    Вибач, файл із тестовим завданням зараз недоступний. 😔
    Ми вже розбираємося. Спробуй, будь ласка, трохи пізніше.
"};

pub const SUBMIT_PROMPT: &str = indoc! {"
    До речі, коли завдання буде готове, просто натисни «Здати завдання»
    тут, у чаті. Успіхів! 💪
"};

pub fn submission_received(first_name: &str) -> String {
    formatdoc! {"
        Дякую, {first_name}! 🎉

        Ми отримали твоє тестове завдання і передали його на перевірку.
        Менеджер зв'яжеться з тобою найближчим часом.
        "}
}

pub const RESTART: &str = indoc! {"
    Починаємо спочатку! 🔄

    Обери напрям, який тебе цікавить:
"};

pub const HELP: &str = indoc! {"
    Я бот школи SkillKlan. Ось що я вмію:

    /start — почати знайомство
    /restart — почати спочатку
    /help — показати цю підказку

    Обери напрям (QA або BA), поділися контактом і отримай тестове завдання.
"};

pub const GREETING: &str = indoc! {"
    Привіт! 👋
    Надішли /start, щоб почати знайомство зі SkillKlan.
"};

pub const UNKNOWN: &str = indoc! {"
    Я тебе не зрозумів. 🤔
    Скористайся кнопками нижче або командою /help.
"};

pub const GENERIC_ERROR: &str = indoc! {"
    Щось пішло не так. 😔
    Спробуй ще раз або почни спочатку командою /restart.
"};

pub const FAQ_INTRO: &str = "Відповіді на поширені запитання: 👇";

pub fn reminder_day3(first_name: &str) -> String {
    formatdoc! {"
        Привіт, {first_name}! 👋

        Нагадую про тестове завдання. Минуло вже 3 робочі дні,
        попереду ще 6. Якщо виникли питання, пиши {admin}.
        ",
        admin = *config::ADMIN_CONTACT,
    }
}

pub fn reminder_day7(first_name: &str) -> String {
    formatdoc! {"
        {first_name}, залишилося всього 2 робочі дні до дедлайну! ⏳

        Якщо потрібна допомога або більше часу, напиши {admin},
        ми завжди на зв'язку.
        ",
        admin = *config::ADMIN_CONTACT,
    }
}

pub fn reminder_day9(first_name: &str) -> String {
    formatdoc! {"
        {first_name}, сьогодні останній день здачі тестового завдання! 🔔

        Натисни «Здати завдання», коли будеш готовий.
        Не встигаєш? Напиши {admin}, домовимося.
        ",
        admin = *config::ADMIN_CONTACT,
    }
}

pub fn format_deadline(deadline: DateTime<Utc>) -> String {
    deadline.format("%d.%m.%Y").to_string()
}
