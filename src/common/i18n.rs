// src/common/i18n.rs

use std::collections::HashMap;

const DEFAULT_LANG: &str = "en";

const EN: &[(&str, &str)] = &[
    ("VALIDATION_ERROR", "One or more fields are invalid."),
    ("MISSING_SALE_PRICE", "high_price cannot be empty when have=false."),
    ("PRICE_BELOW_COST", "high_price ({high_price}) cannot be lower than the product low_price ({low_price})."),
    ("FUTURE_GROUP_DATE", "The date cannot be in the future."),
    ("GROUP_DATE_ALREADY_EXISTS", "You already have a group on this date."),
    ("USERNAME_ALREADY_EXISTS", "This username is already taken."),
    ("EMAIL_ALREADY_EXISTS", "This e-mail is already in use."),
    ("INVALID_CREDENTIALS", "Invalid credentials."),
    ("INVALID_TOKEN", "Invalid or missing authentication token."),
    ("INVALID_RESET_CODE", "Invalid reset code or e-mail."),
    ("UNKNOWN_EMAIL", "No active account uses this e-mail."),
    ("USER_NOT_FOUND", "User not found."),
    ("GROUP_NOT_FOUND", "Group not found."),
    ("PRODUCT_NOT_FOUND", "Product not found."),
    ("UNIT_NOT_FOUND", "Product size not found."),
    ("SELLER_NOT_FOUND", "Seller not found."),
    ("FORBIDDEN", "You do not have permission to perform this action."),
    ("INTERNAL_ERROR", "An unexpected error occurred."),
    ("PASSWORD_RESET_DONE", "Password has been reset."),
    ("PASSWORD_RESET_SENT", "A reset code has been sent to your e-mail."),
];

const PT: &[(&str, &str)] = &[
    ("VALIDATION_ERROR", "Um ou mais campos são inválidos."),
    ("MISSING_SALE_PRICE", "O campo high_price não pode ficar vazio quando have=false."),
    ("PRICE_BELOW_COST", "O high_price ({high_price}) não pode ser menor que o low_price do produto ({low_price})."),
    ("FUTURE_GROUP_DATE", "A data não pode estar no futuro."),
    ("GROUP_DATE_ALREADY_EXISTS", "Você já possui um grupo nesta data."),
    ("USERNAME_ALREADY_EXISTS", "Este nome de usuário já está em uso."),
    ("EMAIL_ALREADY_EXISTS", "Este e-mail já está em uso."),
    ("INVALID_CREDENTIALS", "Credenciais inválidas."),
    ("INVALID_TOKEN", "Token de autenticação inválido ou ausente."),
    ("INVALID_RESET_CODE", "Código de redefinição ou e-mail inválido."),
    ("UNKNOWN_EMAIL", "Nenhuma conta ativa usa este e-mail."),
    ("USER_NOT_FOUND", "Usuário não encontrado."),
    ("GROUP_NOT_FOUND", "Grupo não encontrado."),
    ("PRODUCT_NOT_FOUND", "Produto não encontrado."),
    ("UNIT_NOT_FOUND", "Tamanho do produto não encontrado."),
    ("SELLER_NOT_FOUND", "Vendedor não encontrado."),
    ("FORBIDDEN", "Você não tem permissão para realizar esta ação."),
    ("INTERNAL_ERROR", "Ocorreu um erro inesperado."),
    ("PASSWORD_RESET_DONE", "Senha redefinida com sucesso."),
    ("PASSWORD_RESET_SENT", "Um código de redefinição foi enviado para o seu e-mail."),
];

const RU: &[(&str, &str)] = &[
    ("VALIDATION_ERROR", "Одно или несколько полей заполнены неверно."),
    ("MISSING_SALE_PRICE", "Поле high_price не может быть пустым, если have=False."),
    ("PRICE_BELOW_COST", "Поле high_price ({high_price}) не может быть меньше, чем low_price продукта ({low_price})."),
    ("FUTURE_GROUP_DATE", "Дата не может быть в будущем!"),
    ("GROUP_DATE_ALREADY_EXISTS", "У вас уже есть группа на эту дату."),
    ("USERNAME_ALREADY_EXISTS", "Это имя пользователя уже занято."),
    ("EMAIL_ALREADY_EXISTS", "Этот e-mail уже используется."),
    ("INVALID_CREDENTIALS", "Неверные учетные данные"),
    ("INVALID_TOKEN", "Недействительный или отсутствующий токен."),
    ("INVALID_RESET_CODE", "Неверный код сброса или email."),
    ("UNKNOWN_EMAIL", "Нет активного аккаунта с этим email."),
    ("USER_NOT_FOUND", "Пользователь не найден."),
    ("GROUP_NOT_FOUND", "Группа не найдена."),
    ("PRODUCT_NOT_FOUND", "Продукт не найден."),
    ("UNIT_NOT_FOUND", "Размер продукта не найден."),
    ("SELLER_NOT_FOUND", "Продавец не найден."),
    ("FORBIDDEN", "У вас нет прав на это действие."),
    ("INTERNAL_ERROR", "Произошла непредвиденная ошибка."),
    ("PASSWORD_RESET_DONE", "Пароль успешно сброшен."),
    ("PASSWORD_RESET_SENT", "Код для сброса пароля отправлен на ваш email."),
];

// Catálogo de mensagens por idioma (chave = código do erro).
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let catalogs = [("en", EN), ("pt", PT), ("ru", RU)]
            .into_iter()
            .map(|(lang, entries)| (lang, entries.iter().copied().collect::<HashMap<_, _>>()))
            .collect();
        Self { catalogs }
    }

    /// Busca a mensagem no idioma pedido, caindo para inglês e, por fim, para a própria chave.
    pub fn translate(&self, lang: &str, key: &str, params: &[(&str, String)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .copied()
            .unwrap_or(key);

        params
            .iter()
            .fold(template.to_string(), |msg, (name, value)| {
                msg.replace(&format!("{{{name}}}"), value)
            })
    }
}
